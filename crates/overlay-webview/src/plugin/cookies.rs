use serde_json::{json, Value};

use overlay_common::Result;

use super::commands::{required_text, GetCookieArgs, SetCookieArgs};
use super::OverlayPlugin;
use crate::host::{InputSink, ViewHost};

/// Value of `key` in a `"k1=v1; k2=v2"` cookie header.
pub fn find_cookie_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    header
        .split("; ")
        .find_map(|pair| pair.strip_prefix(key)?.strip_prefix('='))
}

impl<H: ViewHost + InputSink> OverlayPlugin<H> {
    pub(super) fn get_cookie_command(&mut self, args: GetCookieArgs) -> Result<Option<Value>> {
        let url = required_text(args.url.as_deref(), "url")?;
        let header = self.cookies.cookie(url)?;

        let value = match args.key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            None => header,
            Some(key) => header
                .as_deref()
                .and_then(|h| find_cookie_value(h, key))
                .map(str::to_string),
        };
        Ok(Some(json!({ "value": value })))
    }

    pub(super) fn set_cookie_command(&mut self, args: SetCookieArgs) -> Result<Option<Value>> {
        let url = required_text(args.url.as_deref(), "url")?;
        let key = required_text(args.key.as_deref(), "key")?;
        let value = required_text(args.value.as_deref(), "value")?;

        self.cookies.set_cookie(url, &format!("{key}={value}"))?;
        Ok(None)
    }

    pub(super) fn remove_all_cookies_command(&mut self) -> Result<Option<Value>> {
        self.cookies.remove_all()?;
        Ok(None)
    }

    pub(super) fn has_cookies_command(&self) -> Result<Option<Value>> {
        let has = self.cookies.has_cookies()?;
        Ok(Some(json!({ "value": has })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_exact_key() {
        let header = "session=abc; lang=en; session_old=zzz";
        assert_eq!(find_cookie_value(header, "session"), Some("abc"));
        assert_eq!(find_cookie_value(header, "lang"), Some("en"));
        assert_eq!(find_cookie_value(header, "session_old"), Some("zzz"));
    }

    #[test]
    fn prefix_of_another_key_does_not_match() {
        assert_eq!(find_cookie_value("session_old=zzz", "session"), None);
        assert_eq!(find_cookie_value("", "session"), None);
    }

    #[test]
    fn empty_value_is_found() {
        assert_eq!(find_cookie_value("a=; b=2", "a"), Some(""));
    }
}
