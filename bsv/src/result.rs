use hex::FromHexError;

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;

/// Standard error type used in the library
#[derive(Debug)]
pub enum Error {
    /// An argument provided is invalid
    BadArgument(String),
    /// The data provided is invalid
    BadData(String),
    /// The data provided is too small to perform the operation.
    DataTooSmall,
    /// Hex string could not be decoded
    FromHexError(FromHexError),
    /// The compact target has its sign bit set.
    NegativeTarget(u32),
    /// The compact target does not fit in 256 bits.
    TargetOverflow(u32),
    /// Invalid configuration
    InvalidConfiguration(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadArgument(s) => f.write_str(&format!("Bad argument: {}", s)),
            Error::BadData(s) => f.write_str(&format!("Bad data: {}", s)),
            Error::DataTooSmall => f.write_str("data too small"),
            Error::FromHexError(e) => f.write_str(&format!("Hex decoding error: {}", e)),
            Error::NegativeTarget(bits) => {
                f.write_str(&format!("Negative compact target: {:08x}", bits))
            }
            Error::TargetOverflow(bits) => {
                f.write_str(&format!("Compact target overflows 256 bits: {:08x}", bits))
            }
            Error::InvalidConfiguration(s) => f.write_str(&format!("Invalid configuration: {}", s)),
        }
    }
}

impl std::error::Error for Error {}

impl From<FromHexError> for Error {
    fn from(e: FromHexError) -> Self {
        Error::FromHexError(e)
    }
}
