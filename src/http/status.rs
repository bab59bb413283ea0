/// HTTP [Status Code][rfc].
///
/// Any three digit code is accepted. The reason phrase comes from a fixed table, codes outside
/// of it are described as `"Unknown Status"`.
///
/// [rfc]: <https://datatracker.ietf.org/doc/html/rfc9110#name-status-codes>
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl Default for StatusCode {
    #[inline]
    fn default() -> Self {
        Self::OK
    }
}

/// Reason phrase for codes missing from the table.
pub const UNKNOWN_STATUS: &str = "Unknown Status";

impl StatusCode {
    /// Create [`StatusCode`] from an integer in `100..=999`.
    pub const fn from_u16(code: u16) -> Result<Self, InvalidStatusCode> {
        match code {
            100..=999 => Ok(Self(code)),
            _ => Err(InvalidStatusCode(code)),
        }
    }

    /// Returns status code value, e.g: `200`.
    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

macro_rules! status_code {
    (
        $(
            $(#[$doc:meta])*
            $int:literal $id:ident $msg:literal;
        )*
    ) => {
        impl StatusCode {
            /// Returns status message, e.g: `"OK"`.
            #[inline]
            pub const fn reason(&self) -> &'static str {
                match self.0 {
                    $(
                        $int => $msg,
                    )*
                    _ => UNKNOWN_STATUS,
                }
            }
        }

        impl StatusCode {
            $(
                $(#[$doc])*
                pub const $id: Self = Self($int);
            )*
        }
    };
}

status_code! {
    /// `200`. The request succeeded.
    200 OK "OK";
    /// `201`. The request succeeded, and a new resource was created as a result.
    201 CREATED "Created";
    /// `301`. The URL of the requested resource has been changed permanently.
    301 MOVED_PERMANENTLY "Moved Permanently";
    /// `302`. The URI of requested resource has been changed temporarily.
    302 MOVED_TEMPORARILY "Moved Temporarily";
    /// `304`. The response has not been modified, the client can keep its cached version.
    304 NOT_MODIFIED "Not Modified";
    /// `400`. The server cannot or will not process the request due to a client error.
    400 BAD_REQUEST "Bad Request";
    /// `401`. Semantically this response means "unauthenticated".
    401 UNAUTHORIZED "Unauthorized";
    /// `403`. The client does not have access rights to the content.
    403 FORBIDDEN "Forbidden";
    /// `404`. The server cannot find the requested resource.
    404 NOT_FOUND "Not Found";
    /// `405`. The request method is not supported by the target resource.
    405 METHOD_NOT_ALLOWED "Method Not Allowed";
    /// `429`. The user has sent too many requests in a given amount of time.
    429 TOO_MANY_REQUESTS "Too Many Requests";
    /// `500`. The server has encountered a situation it does not know how to handle.
    500 INTERNAL_SERVER_ERROR "Internal Server Error";
    /// `501`. The request method is not supported by the server and cannot be handled.
    501 NOT_IMPLEMENTED "Not Implemented";
    /// `503`. The server is not ready to handle the request.
    503 SERVICE_UNAVAILABLE "Service Unavailable";
}

impl TryFrom<u16> for StatusCode {
    type Error = InvalidStatusCode;

    #[inline]
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_u16(value)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason())
    }
}

impl std::fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("StatusCode").field(&self.0).finish()
    }
}

/// Status code is not a three digit number.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid status code: {0}")]
pub struct InvalidStatusCode(pub u16);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reason_table() {
        assert_eq!(StatusCode::OK.reason(), "OK");
        assert_eq!(StatusCode::MOVED_TEMPORARILY.reason(), "Moved Temporarily");
        assert_eq!(StatusCode::TOO_MANY_REQUESTS.reason(), "Too Many Requests");
        assert_eq!(StatusCode::from_u16(418).unwrap().reason(), UNKNOWN_STATUS);
        assert_eq!(StatusCode::from_u16(204).unwrap().reason(), UNKNOWN_STATUS);
        assert_eq!(StatusCode::NOT_FOUND.to_string(), "404 Not Found");
    }

    #[test]
    fn reject_out_of_range() {
        assert_eq!(StatusCode::from_u16(99), Err(InvalidStatusCode(99)));
        assert_eq!(StatusCode::try_from(1000), Err(InvalidStatusCode(1000)));
        assert_eq!(StatusCode::default(), StatusCode::OK);
    }
}
