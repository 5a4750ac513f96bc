use super::{BridgeError, ConfigError, HostError, StorageError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for ConfigError {
    fn from(message: &'static str) -> Self {
        ConfigError::TestExpectation { message }
    }
}

impl From<String> for ConfigError {
    fn from(value: String) -> Self {
        ConfigError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for StorageError {
    fn from(message: &'static str) -> Self {
        StorageError::TestExpectation { message }
    }
}

impl From<String> for StorageError {
    fn from(value: String) -> Self {
        StorageError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for BridgeError {
    fn from(message: &'static str) -> Self {
        BridgeError::TestExpectation { message }
    }
}

impl From<String> for BridgeError {
    fn from(value: String) -> Self {
        BridgeError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for HostError {
    fn from(message: &'static str) -> Self {
        HostError::TestExpectation { message }
    }
}

impl From<String> for HostError {
    fn from(value: String) -> Self {
        HostError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
