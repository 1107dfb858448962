//! Process-wide credential cache over browser local storage.
//!
//! Populated on login/refresh, cleared on logout or a 401. Business code
//! goes through these three functions and never touches storage directly.

use web_sys::Storage;

const TOKEN_KEY: &str = "roamly.session.token";

fn storage() -> Option<Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

pub fn get_token() -> Option<String> {
    storage()
        .and_then(|storage| storage.get_item(TOKEN_KEY).ok().flatten())
        .filter(|token| !token.is_empty())
}

// Login flows are owned by screens outside this crate's current scope.
#[allow(dead_code)]
pub fn set_token(token: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
    }
}

pub fn clear_token() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_token_lifecycle() {
        clear_token();
        assert_eq!(get_token(), None);

        set_token("abc123");
        assert_eq!(get_token(), Some("abc123".to_string()));

        clear_token();
        assert_eq!(get_token(), None);
    }

    #[wasm_bindgen_test]
    fn test_empty_token_reads_as_absent() {
        set_token("");
        assert_eq!(get_token(), None);
        clear_token();
    }
}
