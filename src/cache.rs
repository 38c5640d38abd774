//! Thread-local cache of compiled ast-grep patterns.
//!
//! Pattern queries are typically repeated over every file of a package, so
//! each distinct pattern string is compiled once per thread. The cache holds
//! at most 128 patterns and is cleared when it fills up.

use crate::sg::errors::AstGrepError;
use crate::sg::lang::go_pattern;
use ast_grep_core::Pattern;
use std::cell::RefCell;
use std::collections::HashMap;

const MAX_CACHE_ENTRIES: usize = 128;

thread_local! {
    static PATTERN_CACHE: RefCell<HashMap<String, Pattern>> =
        RefCell::new(HashMap::new());
}

/// Compiled Go pattern for `pattern`, from the cache when possible.
pub fn compiled_pattern(pattern: &str) -> Result<Pattern, AstGrepError> {
    PATTERN_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(compiled) = cache.get(pattern) {
            return Ok(compiled.clone());
        }

        let compiled = go_pattern(pattern).map_err(|e| AstGrepError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        if cache.len() >= MAX_CACHE_ENTRIES {
            cache.clear();
        }
        cache.insert(pattern.to_string(), compiled.clone());
        Ok(compiled)
    })
}

pub fn clear_cache() {
    PATTERN_CACHE.with(|cache| cache.borrow_mut().clear());
}

pub fn cache_size() -> usize {
    PATTERN_CACHE.with(|cache| cache.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_pattern_compiles_once() {
        clear_cache();
        compiled_pattern("fmt.Println($A)").unwrap();
        compiled_pattern("fmt.Println($A)").unwrap();
        assert_eq!(cache_size(), 1);

        compiled_pattern("len($X)").unwrap();
        assert_eq!(cache_size(), 2);
    }

    #[test]
    fn cache_is_bounded() {
        clear_cache();
        for i in 0..=MAX_CACHE_ENTRIES {
            compiled_pattern(&format!("f{i}($A)")).unwrap();
        }
        assert!(cache_size() <= MAX_CACHE_ENTRIES);
    }
}
