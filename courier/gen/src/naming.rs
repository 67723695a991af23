//! Naming helpers for generated items and files.
//!
//! - `UserApi` -> `user_api.rs`, `UserApiClient`
//! - `HTTPService` -> `http_service.rs`
//! - `basic_auth` -> `BasicAuth` (attribute names to tag names)

/// Splits a CamelCase identifier into words.
///
/// - "UserApi" -> ["User", "Api"]
/// - "HTTPClient" -> ["HTTP", "Client"]
/// - "OpenAI" -> ["Open", "AI"]
/// - "users" -> ["users"]
pub fn split_camel_case(s: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut words = Vec::new();
    let mut word_start = 0;

    for i in 1..chars.len() {
        let (at, current) = chars[i];
        let prev = chars[i - 1].1;
        let next_is_lower = chars.get(i + 1).is_some_and(|(_, c)| c.is_lowercase());

        // "userApi" -> "user", "Api"; "HTTPClient" -> "HTTP", "Client"
        let is_new_word = current.is_uppercase()
            && (prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower));

        if is_new_word && at > word_start {
            words.push(&s[word_start..at]);
            word_start = at;
        }
    }

    if word_start < s.len() {
        words.push(&s[word_start..]);
    }
    words
}

/// Converts a CamelCase name to snake_case.
///
/// ## Examples
///
/// ```
/// use courier_gen::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("UserApi"), "user_api");
/// assert_eq!(to_snake_case("HTTPService"), "http_service");
/// ```
pub fn to_snake_case(name: &str) -> String {
    split_camel_case(name)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Converts a snake_case attribute name to the PascalCase tag name.
///
/// ## Examples
///
/// ```
/// use courier_gen::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("bearer_auth"), "BearerAuth");
/// assert_eq!(to_pascal_case("http2"), "Http2");
/// assert_eq!(to_pascal_case("Query"), "Query");
/// ```
pub fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// File name of the generated module for an interface.
pub fn module_file_name(interface: &str) -> String {
    format!("{}.rs", to_snake_case(interface))
}

/// Name of the generated client type.
pub fn client_type_name(interface: &str, suffix: &str) -> String {
    format!("{interface}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_camel_case_multi_word() {
        assert_eq!(split_camel_case("UserApi"), vec!["User", "Api"]);
        assert_eq!(split_camel_case("GitHubRepoService"), vec!["Git", "Hub", "Repo", "Service"]);
    }

    #[test]
    fn split_camel_case_acronyms() {
        assert_eq!(split_camel_case("HTTPClient"), vec!["HTTP", "Client"]);
        assert_eq!(split_camel_case("OpenAI"), vec!["Open", "AI"]);
        assert_eq!(split_camel_case("API"), vec!["API"]);
    }

    #[test]
    fn split_camel_case_single_and_empty() {
        assert_eq!(split_camel_case("users"), vec!["users"]);
        assert!(split_camel_case("").is_empty());
    }

    #[test]
    fn split_camel_case_after_digits() {
        assert_eq!(split_camel_case("S3Bucket"), vec!["S3", "Bucket"]);
    }

    #[test]
    fn file_names() {
        assert_eq!(module_file_name("UserApi"), "user_api.rs");
        assert_eq!(module_file_name("Pets"), "pets.rs");
    }

    #[test]
    fn client_names() {
        assert_eq!(client_type_name("UserApi", "Client"), "UserApiClient");
        assert_eq!(client_type_name("UserApi", "Impl"), "UserApiImpl");
    }

    #[test]
    fn pascal_case() {
        assert_eq!(to_pascal_case("throws"), "Throws");
        assert_eq!(to_pascal_case("hawk_auth"), "HawkAuth");
        assert_eq!(to_pascal_case("request_options"), "RequestOptions");
    }
}
