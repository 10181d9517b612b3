//! Commands sent by the controlling application.
//!
//! Wire form is `{"method": "<name>", "args": {...}}` with camelCase names.
//! Argument fields are all optional at this layer so that a missing field
//! produces a specific validation message instead of a generic parse error.

use overlay_common::{OverlayError, Result, SurfaceId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::surface::{RawBounds, RawSurfaceConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "camelCase")]
pub enum Command {
    Create(CreateArgs),
    Destroy(IdArgs),
    Show(IdArgs),
    Hide(IdArgs),
    OnResize(BoundsArgs),
    /// Same as `OnResize`; sent when the host page scrolls.
    OnScroll(BoundsArgs),
    EnableTouch(IdArgs),
    DisableTouch(IdArgs),
    DispatchWebViewEvent(FocusArgs),
    LoadUrl(LoadUrlArgs),
    EvaluateJavascript(ScriptArgs),
    GetCookie(GetCookieArgs),
    SetCookie(SetCookieArgs),
    RemoveAllCookies(NoArgs),
    HasCookies(NoArgs),
}

/// Arguments of a command that takes none. `args` may be absent, `null` or
/// an object; object fields are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoArgs {}

impl<'de> Deserialize<'de> for NoArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)?;
        Ok(Self {})
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdArgs {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArgs {
    pub id: Option<String>,
    pub config: Option<RawSurfaceConfig>,
    #[serde(default)]
    pub force_create: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsArgs {
    pub id: Option<String>,
    pub web_view_bounds: Option<RawBounds>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusArgs {
    pub id: Option<String>,
    #[serde(default)]
    pub focus: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadUrlArgs {
    pub id: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptArgs {
    pub id: Option<String>,
    pub script: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCookieArgs {
    pub url: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCookieArgs {
    pub url: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
}

impl Command {
    /// Parse a command from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| OverlayError::validation(format!("malformed command: {e}")))
    }

    /// Wire name of the command.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Destroy(_) => "destroy",
            Self::Show(_) => "show",
            Self::Hide(_) => "hide",
            Self::OnResize(_) => "onResize",
            Self::OnScroll(_) => "onScroll",
            Self::EnableTouch(_) => "enableTouch",
            Self::DisableTouch(_) => "disableTouch",
            Self::DispatchWebViewEvent(_) => "dispatchWebViewEvent",
            Self::LoadUrl(_) => "loadUrl",
            Self::EvaluateJavascript(_) => "evaluateJavascript",
            Self::GetCookie(_) => "getCookie",
            Self::SetCookie(_) => "setCookie",
            Self::RemoveAllCookies(_) => "removeAllCookies",
            Self::HasCookies(_) => "hasCookies",
        }
    }

    // -- constructors --------------------------------------------------------

    pub fn create(id: impl Into<String>, config: RawSurfaceConfig, force: bool) -> Self {
        Self::Create(CreateArgs {
            id: Some(id.into()),
            config: Some(config),
            force_create: Some(force),
        })
    }

    pub fn destroy(id: impl Into<String>) -> Self {
        Self::Destroy(IdArgs::new(id))
    }

    pub fn show(id: impl Into<String>) -> Self {
        Self::Show(IdArgs::new(id))
    }

    pub fn hide(id: impl Into<String>) -> Self {
        Self::Hide(IdArgs::new(id))
    }

    pub fn resize(id: impl Into<String>, bounds: RawBounds) -> Self {
        Self::OnResize(BoundsArgs {
            id: Some(id.into()),
            web_view_bounds: Some(bounds),
        })
    }

    pub fn enable_touch(id: impl Into<String>) -> Self {
        Self::EnableTouch(IdArgs::new(id))
    }

    pub fn disable_touch(id: impl Into<String>) -> Self {
        Self::DisableTouch(IdArgs::new(id))
    }

    pub fn focus(id: impl Into<String>, focus: bool) -> Self {
        Self::DispatchWebViewEvent(FocusArgs {
            id: Some(id.into()),
            focus: Some(focus),
        })
    }

    pub fn load_url(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self::LoadUrl(LoadUrlArgs {
            id: Some(id.into()),
            url: Some(url.into()),
        })
    }

    pub fn evaluate(id: impl Into<String>, script: impl Into<String>) -> Self {
        Self::EvaluateJavascript(ScriptArgs {
            id: Some(id.into()),
            script: Some(script.into()),
        })
    }

    pub fn get_cookie(url: impl Into<String>, key: Option<&str>) -> Self {
        Self::GetCookie(GetCookieArgs {
            url: Some(url.into()),
            key: key.map(str::to_string),
        })
    }

    pub fn set_cookie(
        url: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::SetCookie(SetCookieArgs {
            url: Some(url.into()),
            key: Some(key.into()),
            value: Some(value.into()),
        })
    }

    pub fn remove_all_cookies() -> Self {
        Self::RemoveAllCookies(NoArgs {})
    }

    pub fn has_cookies() -> Self {
        Self::HasCookies(NoArgs {})
    }
}

impl IdArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }
}

/// Non-empty surface id, or the standard validation error.
pub(crate) fn required_id(id: Option<&str>) -> Result<SurfaceId> {
    match id {
        Some(id) if !id.is_empty() => Ok(SurfaceId::from(id)),
        _ => Err(OverlayError::validation("id is required")),
    }
}

/// Non-blank string argument, or `"<name> is required"`.
pub(crate) fn required_text<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(OverlayError::validation(format!("{name} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_with_camel_case_fields() {
        let cmd = Command::from_json(
            r#"{"method":"create","args":{"id":"w1","forceCreate":true,
                "config":{"x":0,"y":0,"width":100,"height":200,"devicePixelRatio":2}}}"#,
        )
        .unwrap();
        match cmd {
            Command::Create(args) => {
                assert_eq!(args.id.as_deref(), Some("w1"));
                assert_eq!(args.force_create, Some(true));
                let config = args.config.unwrap();
                assert_eq!(config.device_pixel_ratio, Some(2.0));
                assert_eq!(config.width, Some(100.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_resize_bounds() {
        let cmd = Command::from_json(
            r#"{"method":"onScroll","args":{"id":"w1","webViewBounds":{"x":1,"y":2,"width":3,"height":4}}}"#,
        )
        .unwrap();
        assert_eq!(cmd.method(), "onScroll");
        match cmd {
            Command::OnScroll(args) => {
                let rect = args.web_view_bounds.unwrap().to_rect().unwrap();
                assert!((rect.height - 4.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn argless_commands_parse_without_args() {
        assert_eq!(
            Command::from_json(r#"{"method":"hasCookies"}"#).unwrap(),
            Command::has_cookies()
        );
        assert_eq!(
            Command::from_json(r#"{"method":"removeAllCookies","args":null}"#).unwrap(),
            Command::remove_all_cookies()
        );
        assert_eq!(
            Command::from_json(r#"{"method":"hasCookies","args":{}}"#).unwrap(),
            Command::has_cookies()
        );
        assert_eq!(
            Command::from_json(r#"{"method":"removeAllCookies","args":{"unused":1}}"#).unwrap(),
            Command::remove_all_cookies()
        );
    }

    #[test]
    fn argless_commands_reject_non_object_args() {
        let err = Command::from_json(r#"{"method":"hasCookies","args":5}"#).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }

    #[test]
    fn missing_fields_parse_as_none() {
        let cmd = Command::from_json(r#"{"method":"loadUrl","args":{"id":"w1"}}"#).unwrap();
        assert_eq!(
            cmd,
            Command::LoadUrl(LoadUrlArgs {
                id: Some("w1".into()),
                url: None,
            })
        );
    }

    #[test]
    fn unknown_method_is_validation_error() {
        let err = Command::from_json(r#"{"method":"onDisplay","args":{}}"#).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
        assert!(err.to_string().starts_with("malformed command"));
    }

    #[test]
    fn serializes_to_wire_form() {
        let json = serde_json::to_value(Command::focus("w1", true)).unwrap();
        assert_eq!(json["method"], "dispatchWebViewEvent");
        assert_eq!(json["args"]["id"], "w1");
        assert_eq!(json["args"]["focus"], true);
    }

    #[test]
    fn required_helpers() {
        assert!(required_id(None).is_err());
        assert!(required_id(Some("")).is_err());
        assert_eq!(required_id(Some("a")).unwrap().as_str(), "a");

        let err = required_text(Some("   "), "url").unwrap_err();
        assert_eq!(err.to_string(), "url is required");
        assert_eq!(required_text(Some("x"), "url").unwrap(), "x");
    }
}
