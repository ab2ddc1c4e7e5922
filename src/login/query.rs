/// Login hints read from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginQuery {
    pub login: Option<String>,
    pub token: Option<String>,
}

impl LoginQuery {
    /// Parse `search`, with or without its leading `?`.
    ///
    /// Empty values count as absent.
    pub fn parse(search: &str) -> Self {
        let mut query = Self::default();
        for pair in search.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode(value);
            if value.is_empty() {
                continue;
            }
            match decode(key).as_str() {
                "login" => query.login = Some(value),
                "token" => query.token = Some(value),
                _ => {}
            }
        }
        query
    }
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
