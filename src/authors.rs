use log::info;
use std::collections::HashMap;
use std::sync::Arc;

use crate::client::{decode_data, GraphQlTransport};
use crate::error::{CommentsError, Result};
use crate::types::{AuthorInfo, UserNode};

/// Builds one query selecting every handle under a positional alias
/// (`user0`, `user1`, ...). Returns `None` for an empty list.
pub fn build_user_query(authors: &[String]) -> Option<String> {
    if authors.is_empty() {
        return None;
    }

    let mut query = String::from("query get_user {");
    for (i, author) in authors.iter().enumerate() {
        // JSON string literals are valid GraphQL string literals.
        let login = serde_json::Value::String(author.clone()).to_string();
        query.push_str(&format!(
            "\n    user{}: user(login: {}) {{\n        name\n        url\n        login\n    }}",
            i, login
        ));
    }
    query.push_str("\n}");

    Some(query)
}

pub struct AuthorResolver {
    transport: Arc<dyn GraphQlTransport>,
}

impl AuthorResolver {
    pub fn new(transport: Arc<dyn GraphQlTransport>) -> Self {
        Self { transport }
    }

    /// Looks up every handle in one batched query. The result is keyed by
    /// the `login` GitHub returns, not by the alias used to request it.
    pub async fn resolve(&self, authors: &[String]) -> Result<HashMap<String, AuthorInfo>> {
        let query = match build_user_query(authors) {
            Some(query) => query,
            None => return Ok(HashMap::new()),
        };

        info!("Resolving {} authors", authors.len());
        let raw = self.transport.post_query(&query).await?;
        let data: HashMap<String, Option<UserNode>> = decode_data(raw)?;

        data.into_iter()
            .map(|(alias, user)| {
                let user = user.ok_or_else(|| {
                    CommentsError::MalformedResponse(format!("{} resolved to no user", alias))
                })?;
                Ok((
                    user.login,
                    AuthorInfo {
                        name: user.name,
                        url: user.url,
                    },
                ))
            })
            .collect()
    }
}
