//! PageRequest - Offset/limit window over an ordered listing

use serde::Serialize;

use crate::domain::errors::DomainError;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    offset: u64,
    limit: u32,
}

impl PageRequest {
    pub fn new(offset: u64, limit: u32) -> Result<Self, DomainError> {
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(DomainError::invalid_field(
                "limit",
                format!("must be between 1 and {MAX_PAGE_LIMIT}"),
            ));
        }
        Ok(Self { offset, limit })
    }

    /// Build from optional query parameters, filling in defaults
    pub fn from_optional(offset: Option<u64>, limit: Option<u32>) -> Result<Self, DomainError> {
        Self::new(offset.unwrap_or(0), limit.unwrap_or(DEFAULT_PAGE_LIMIT))
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}
