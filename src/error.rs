use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum BridgeError {
    #[error("No controller registered for account {0}")]
    UnknownAccount(String),

    #[error("Can't receive devices list from cloud")]
    DevicesUnavailable,

    #[error("Device {0} is not in the devices list")]
    UnknownDevice(String),

    #[error("Can't receive sensors list for device '{0}' from cloud")]
    SensorsUnavailable(String),

    #[error("Controller error: {0}")]
    Controller(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
