use crate::error::{Error, Result};

const MAX_REPO_NAME_LEN: usize = 100;

const RESERVED_REPO_NAMES: &[&str] = &[".", "..", "-"];
const RESERVED_REPO_SUFFIXES: &[&str] = &[".git", ".wiki"];

/// NameValidator decides whether a repository name may be used.
pub trait NameValidator: Send + Sync {
    fn is_name_allowed(&self, name: &str) -> Result<()>;
}

impl<F> NameValidator for F
where
    F: Fn(&str) -> Result<()> + Send + Sync,
{
    fn is_name_allowed(&self, name: &str) -> Result<()> {
        self(name)
    }
}

/// Default repository name rules: a bounded set of characters, no reserved
/// names, no names that collide with on-disk suffixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNameValidator;

impl NameValidator for DefaultNameValidator {
    fn is_name_allowed(&self, name: &str) -> Result<()> {
        is_repo_name_allowed(name)
    }
}

fn is_valid_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
}

pub fn is_repo_name_allowed(name: &str) -> Result<()> {
    let rejected = || Error::NameNotAllowed {
        name: name.to_string(),
    };

    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.len() != name.len() || name.len() > MAX_REPO_NAME_LEN {
        return Err(rejected());
    }
    if !name.chars().all(is_valid_name_char) {
        return Err(rejected());
    }

    let lower = name.to_lowercase();
    if RESERVED_REPO_NAMES.contains(&lower.as_str()) {
        return Err(rejected());
    }
    if RESERVED_REPO_SUFFIXES
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return Err(rejected());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_names() {
        assert!(is_repo_name_allowed("demo").is_ok());
        assert!(is_repo_name_allowed("My-Repo_1.0").is_ok());
        assert!(is_repo_name_allowed(".dotfiles").is_ok());
    }

    #[test]
    fn test_reserved_names() {
        assert!(is_repo_name_allowed(".").is_err());
        assert!(is_repo_name_allowed("..").is_err());
        assert!(is_repo_name_allowed("-").is_err());
        assert!(is_repo_name_allowed("project.git").is_err());
        assert!(is_repo_name_allowed("project.WIKI").is_err());
    }

    #[test]
    fn test_invalid_characters_and_length() {
        assert!(is_repo_name_allowed("").is_err());
        assert!(is_repo_name_allowed(" demo").is_err());
        assert!(is_repo_name_allowed("demo\n").is_err());
        assert!(is_repo_name_allowed("   ").is_err());
        assert!(is_repo_name_allowed("a/b").is_err());
        assert!(is_repo_name_allowed("caf\u{e9}").is_err());
        assert!(is_repo_name_allowed(&"a".repeat(MAX_REPO_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_rejection_carries_name() {
        match is_repo_name_allowed("x.git") {
            Err(Error::NameNotAllowed { name }) => assert_eq!(name, "x.git"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_closure_validator() {
        let only_demo = |name: &str| {
            if name == "demo" {
                Ok(())
            } else {
                Err(Error::NameNotAllowed {
                    name: name.to_string(),
                })
            }
        };
        assert!(only_demo.is_name_allowed("demo").is_ok());
        assert!(only_demo.is_name_allowed("other").is_err());
    }
}
