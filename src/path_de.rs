use serde::de::DeserializeOwned;

use crate::error::{GenerateError, Result};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        GenerateError::Config(format!("at JSON path {path} → {}", err.into_inner()))
    })
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        GenerateError::Config(format!("at JSON path {path} → {}", err.into_inner()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Outer {
        inner: Inner,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Inner {
        count: u32,
    }

    #[test]
    fn errors_carry_the_json_path() {
        let err = from_str_with_path::<Outer>(r#"{"inner": {"count": "many"}}"#).unwrap_err();
        let GenerateError::Config(message) = err else { panic!("expected config error") };
        assert!(message.starts_with("at JSON path inner.count"), "{message}");
    }

    #[test]
    fn slices_deserialize_too() {
        let outer: Outer = from_slice_with_path(br#"{"inner": {"count": 3}}"#).unwrap();
        assert_eq!(outer.inner.count, 3);
    }
}
