/// HTTP Method of the request being answered.
///
/// This API follows the [RFC9110] and the PATCH method from [RFC5789].
///
/// Only [`Method::HEAD`] changes how a response is transmitted: the body is suppressed while
/// the headers still describe it.
///
/// [RFC5789]: https://www.rfc-editor.org/rfc/rfc5789
/// [RFC9110]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-methods>
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Method(u8);

struct Props {
    value: &'static [u8],
}

props! {
    static PROPS: [9];

    /// The [GET] method requests transfer of a current selected representation for the target
    /// resource.
    ///
    /// [GET]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-get>
    pub const GET = (0, b"GET");
    /// The [HEAD] method is identical to GET except that the server MUST NOT send content in the
    /// response.
    ///
    /// [HEAD]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-head>
    pub const HEAD = (1, b"HEAD");
    /// The [POST] method.
    ///
    /// [POST]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-post>
    pub const POST = (2, b"POST");
    /// The [PUT] method.
    ///
    /// [PUT]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-put>
    pub const PUT = (3, b"PUT");
    /// The [DELETE] method.
    ///
    /// [DELETE]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-delete>
    pub const DELETE = (4, b"DELETE");
    /// The [CONNECT] method.
    ///
    /// [CONNECT]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-connect>
    pub const CONNECT = (5, b"CONNECT");
    /// The [OPTIONS] method.
    ///
    /// [OPTIONS]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-options>
    pub const OPTIONS = (6, b"OPTIONS");
    /// The [TRACE] method.
    ///
    /// [TRACE]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-trace>
    pub const TRACE = (7, b"TRACE");
    /// The [PATCH] method.
    ///
    /// [PATCH]: <https://www.rfc-editor.org/rfc/rfc5789#section-2>
    pub const PATCH = (8, b"PATCH");
}

impl Method {
    /// Returns `true` if the response must not carry content.
    #[inline]
    pub const fn is_head(&self) -> bool {
        self.0 == Self::HEAD.0
    }

    /// Returns string representation of the method.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match std::str::from_utf8(PROPS[self.0 as usize].value) {
            Ok(s) => s,
            Err(_) => unreachable!(),
        }
    }
}

impl std::str::FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes()).ok_or(UnknownMethod)
    }
}

impl std::fmt::Debug for Method {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.as_str(), f)
    }
}

impl std::fmt::Display for Method {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Error =====

/// Method is not one of the supported methods.
#[derive(Debug, thiserror::Error)]
#[error("unknown method")]
pub struct UnknownMethod;

// ===== Macros =====

macro_rules! props {
    (
        static $props:ident: [$len:literal];
        $(
           $(#[$doc:meta])*
           pub const $name:ident = ($idx:literal, $val:literal);
        )*
    ) => {
        impl Method {
            $(
               $(#[$doc])*
               pub const $name: Self = Self($idx);
            )*

            /// Create [`Method`] from bytes.
            #[inline]
            pub const fn from_bytes(src: &[u8]) -> Option<Method> {
                match src {
                    $(
                        $val => Some(Self::$name),
                    )*
                    _ => None,
                }
            }
        }

        static $props: [Props; $len] = [
            $(
                Props { value: $val },
            )*
        ];
    };
}

use props;

#[cfg(test)]
mod test {
    use super::Method;

    #[test]
    fn parse_method() {
        assert_eq!("HEAD".parse::<Method>().ok(), Some(Method::HEAD));
        assert_eq!(Method::from_bytes(b"GET"), Some(Method::GET));
        assert!("head".parse::<Method>().is_err());
        assert!(Method::HEAD.is_head());
        assert!(!Method::GET.is_head());
        assert_eq!(Method::default(), Method::GET);
        assert_eq!(Method::PATCH.to_string(), "PATCH");
    }
}
