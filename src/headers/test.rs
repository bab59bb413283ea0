use crate::headers::{HeaderError, HeaderMap, validate_name, validate_value};

const fn is_send_sync<T: Send + Sync>() { }
const _: () = {
    is_send_sync::<HeaderMap>();
};

#[test]
fn header_map() {
    let mut map = HeaderMap::new();

    assert!(map.insert("Content-Type", "text/plain").is_none());
    assert!(map.insert("X-Trace", "1").is_none());
    assert!(map.insert("Server", "reply").is_none());

    assert!(map.contains_key("Content-Type"));
    assert!(!map.contains_key("content-type"));
    assert!(map.contains_key_ignore_case("content-type"));
    assert_eq!(map.get_ignore_case("x-trace"), Some("1"));
    assert_eq!(map.get("server"), None);

    // Replace keeps position

    assert_eq!(map.insert("X-Trace", "2").as_deref(), Some("1"));
    assert_eq!(map.len(), 3);
    let names: Vec<_> = map.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["Content-Type", "X-Trace", "Server"]);

    // Distinct case is a distinct key

    assert!(map.insert("x-trace", "3").is_none());
    assert_eq!(map.len(), 4);

    // Remove

    assert_eq!(map.remove("Content-Type").as_deref(), Some("text/plain"));
    assert!(map.remove("Content-Type").is_none());
    assert_eq!(map.len(), 3);
    assert_eq!(map.iter().next(), Some(("X-Trace", "2")));
}

#[test]
fn defaults_never_override() {
    let map: HeaderMap = [("Server", "app"), ("X-One", "1")].into_iter().collect();
    let defaults: HeaderMap = [("server", "default"), ("X-Frame-Options", "DENY"), ("x-one", "d")]
        .into_iter()
        .collect();

    let merged: Vec<_> = map.with_defaults(&defaults).collect();
    assert_eq!(merged, [("Server", "app"), ("X-One", "1"), ("X-Frame-Options", "DENY")]);

    let empty = HeaderMap::new();
    let merged: Vec<_> = empty.with_defaults(&defaults).collect();
    assert_eq!(merged.len(), 3);
}

#[test]
fn validation() {
    assert!(validate_name("X-Request-Id").is_ok());
    assert!(validate_name("").is_ok());
    assert_eq!(validate_name("Bad Name"), Err(HeaderError::InvalidName("Bad Name".into())));
    assert!(validate_name("a:b").is_err());

    assert!(validate_value("X", "text/html; charset=utf-8").is_ok());
    assert_eq!(validate_value("X", "a\r\nInjected: 1"), Err(HeaderError::InvalidValue("X".into())));

    let mut map = HeaderMap::new();
    assert!(map.try_insert("X-Ok", "1").is_ok());
    assert!(map.try_insert("X-Bad", "1\n").is_err());
    assert_eq!(map.len(), 1);

    map.insert("X-Bad", "\0");
    assert!(map.validate().is_err());
}
