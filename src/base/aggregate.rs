//! Composite error for a race in which every attempt failed.

use crate::base::neterror::NetError;
use std::error::Error;
use std::fmt;

/// One error wrapping the failure of every connection attempt.
///
/// The underlying errors are kept in the order their attempts completed,
/// which is not necessarily the order the candidates were resolved in.
#[derive(Debug, Clone, Default)]
pub struct AggregateError {
    errors: Vec<NetError>,
}

impl AggregateError {
    pub fn new(errors: Vec<NetError>) -> Self {
        Self { errors }
    }

    /// Append one more failure.
    pub fn push(&mut self, error: NetError) {
        self.errors.push(error);
    }

    /// The underlying errors, in completion order.
    pub fn errors(&self) -> &[NetError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NetError> {
        self.errors.iter()
    }

    pub fn into_inner(self) -> Vec<NetError> {
        self.errors
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.len() {
            0 => f.write_str("no errors occurred"),
            1 => write!(f, "1 error occurred:\n\t* {}", self.errors[0]),
            n => {
                write!(f, "{} errors occurred:", n)?;
                for err in &self.errors {
                    write!(f, "\n\t* {}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl Error for AggregateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.errors.first().map(|e| e as &(dyn Error + 'static))
    }
}

impl FromIterator<NetError> for AggregateError {
    fn from_iter<I: IntoIterator<Item = NetError>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for AggregateError {
    type Item = NetError;
    type IntoIter = std::vec::IntoIter<NetError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a AggregateError {
    type Item = &'a NetError;
    type IntoIter = std::slice::Iter<'a, NetError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_display_lists_every_error() {
        let agg = AggregateError::new(vec![
            NetError::connection_failed_to("10.0.0.1", 80, IoError::from(ErrorKind::ConnectionRefused)),
            NetError::ConnectionTimedOut,
        ]);

        let text = agg.to_string();
        assert!(text.starts_with("2 errors occurred:"));
        assert!(text.contains("\n\t* Connection to 10.0.0.1:80 failed"));
        assert!(text.contains("\n\t* Connection timed out"));
    }

    #[test]
    fn test_display_single_error() {
        let agg = AggregateError::new(vec![NetError::ConnectionRefused]);
        assert_eq!(agg.to_string(), "1 error occurred:\n\t* Connection refused");
    }

    #[test]
    fn test_source_is_first_error() {
        let agg: AggregateError = vec![NetError::ConnectionReset, NetError::ConnectionRefused]
            .into_iter()
            .collect();

        let source = agg.source().expect("should expose a source");
        assert_eq!(source.to_string(), "Connection reset (TCP RST)");
    }

    #[test]
    fn test_order_is_preserved() {
        let mut agg = AggregateError::default();
        agg.push(NetError::ConnectionRefused);
        agg.push(NetError::ConnectionTimedOut);
        agg.push(NetError::AddressUnreachable);

        assert_eq!(agg.len(), 3);
        let codes: Vec<i32> = agg.iter().map(NetError::as_i32).collect();
        assert_eq!(codes, vec![-102, -118, -109]);
    }

    #[test]
    fn test_wraps_into_net_error() {
        let err: NetError = AggregateError::new(vec![NetError::ConnectionRefused]).into();
        match &err {
            NetError::AllAttemptsFailed(agg) => assert_eq!(agg.len(), 1),
            other => panic!("Expected AllAttemptsFailed, got {:?}", other),
        }
        assert_eq!(err.as_i32(), -104);
    }
}
