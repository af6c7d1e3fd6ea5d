use std::fmt;

/// Stable error codes for all contract diagnostics.
///
/// Format: P####. The code identifies the violation category, not the
/// call site, so embedders can match on it programmatically.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Parameter or return position lacks a type annotation
    P0001,
    /// Call supplied arguments positionally
    P0002,
    /// Value does not conform to its declared type
    P0003,
    /// Forward reference could not be resolved
    P0004,
    /// Forward-reference resolution cycle
    P0005,
    /// Documentation disagrees with the signature
    P0006,
    /// Method introspected before its owning instance is known
    P0007,
    /// Argument binding failure (unknown, missing, or duplicate name)
    P0008,
    /// Strict-mode declaration lint (bare container annotation)
    P0009,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::P0001 => "P0001",
            ErrorCode::P0002 => "P0002",
            ErrorCode::P0003 => "P0003",
            ErrorCode::P0004 => "P0004",
            ErrorCode::P0005 => "P0005",
            ErrorCode::P0006 => "P0006",
            ErrorCode::P0007 => "P0007",
            ErrorCode::P0008 => "P0008",
            ErrorCode::P0009 => "P0009",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_renders_as_string() {
        assert_eq!(ErrorCode::P0003.to_string(), "P0003");
        assert_eq!(ErrorCode::P0001.as_str(), "P0001");
    }
}
