//! Three-state request result
//!
//! A request emits exactly one `Loading` followed by exactly one terminal
//! `Success` or `Error`.

use serde::Serialize;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum CacheState<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> CacheState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, CacheState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            CacheState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            CacheState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CacheState::Error(reason) => Some(reason),
            _ => None,
        }
    }
}

impl<T> From<Result<T, Error>> for CacheState<T> {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => CacheState::Success(value),
            Err(e) => CacheState::Error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        let ok: CacheState<u32> = Ok(7).into();
        assert_eq!(ok, CacheState::Success(7));
        assert!(ok.is_terminal());

        let err: CacheState<u32> = Err(Error::Internal("boom".into())).into();
        assert_eq!(err.error(), Some("Internal error: boom"));
        assert!(err.success().is_none());
    }

    #[test]
    fn test_loading_is_not_terminal() {
        let state: CacheState<()> = CacheState::Loading;
        assert!(state.is_loading());
        assert!(!state.is_terminal());
        assert!(state.into_success().is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(CacheState::Success(3)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "success", "data": 3}));

        let json = serde_json::to_value(CacheState::<u8>::Loading).unwrap();
        assert_eq!(json, serde_json::json!({"state": "loading"}));
    }
}
