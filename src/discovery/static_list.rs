//! Static endpoint lists.

use async_trait::async_trait;

use crate::discovery::resolver::{Resolve, ResolveError};
use crate::load_balancer::Endpoint;

/// Splits a comma separated spec into endpoints, in order.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticResolver;

impl StaticResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(spec: &str) -> Result<Vec<Endpoint>, ResolveError> {
        let endpoints: Vec<Endpoint> = spec
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Endpoint::from)
            .collect();

        if endpoints.is_empty() {
            return Err(ResolveError::InvalidSpec(spec.to_string()));
        }
        Ok(endpoints)
    }
}

#[async_trait]
impl Resolve for StaticResolver {
    async fn resolve(&self, spec: &str) -> Result<Vec<Endpoint>, ResolveError> {
        Self::parse(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn splits_in_order() {
        let endpoints = StaticResolver::new().resolve("a:1,b:2,c:3").await.unwrap();
        let expected: Vec<Endpoint> = vec!["a:1".into(), "b:2".into(), "c:3".into()];
        assert_eq!(endpoints, expected);
    }

    #[tokio::test]
    async fn empty_spec_is_invalid() {
        let err = StaticResolver::new().resolve("").await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidSpec(s) if s.is_empty()));

        assert!(matches!(
            StaticResolver::parse(" , ,"),
            Err(ResolveError::InvalidSpec(_))
        ));
    }

    #[test]
    fn tolerates_whitespace_and_stray_commas() {
        let endpoints = StaticResolver::parse(" 10.0.0.1:80 ,,10.0.0.2:80, ").unwrap();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0], "10.0.0.1:80");
        assert_eq!(endpoints[1], "10.0.0.2:80");
    }
}
