use std::fmt;

#[derive(Debug)]
pub enum GalakeiError {
    Stylesheet(String),
    Io(std::io::Error),
}

impl fmt::Display for GalakeiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalakeiError::Stylesheet(message) => {
                write!(f, "stylesheet could not be resolved: {}", message)
            }
            GalakeiError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for GalakeiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GalakeiError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GalakeiError {
    fn from(value: std::io::Error) -> Self {
        GalakeiError::Io(value)
    }
}
