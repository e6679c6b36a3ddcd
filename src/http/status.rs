macro_rules! status_codes {
    (
        $(
            $(#[$doc:meta])*
            $int:literal $id:ident $msg:literal;
        )*
    ) => {
        /// HTTP [Status Code][rfc].
        ///
        /// This is a closed set: a response can only carry a status this type
        /// can represent. Extending the set means adding a row to the macro
        /// table, which generates the variant and its serialized reason
        /// phrase together.
        ///
        /// [rfc]: <https://datatracker.ietf.org/doc/html/rfc9110#name-status-codes>
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub enum StatusCode {
            $(
                $(#[$doc])*
                $id = $int,
            )*
        }

        impl StatusCode {
            /// Returns status code value, e.g: `200`.
            #[inline]
            pub const fn status(&self) -> u16 {
                *self as u16
            }

            /// Returns status code and message as string slice, e.g: `"200 OK"`.
            #[inline]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(
                        Self::$id => concat!(stringify!($int)," ",$msg),
                    )*
                }
            }

            /// Returns status message, e.g: `"OK"`.
            #[inline]
            pub const fn message(&self) -> &'static str {
                match self {
                    $(
                        Self::$id => $msg,
                    )*
                }
            }
        }
    };
}

status_codes! {
    /// `200`. The request succeeded.
    200 Ok "OK";
    /// `400`. The server cannot or will not process the request due to something that is perceived
    /// to be a client error.
    400 BadRequest "Bad Request";
    /// `500`. The server has encountered a situation it does not know how to handle.
    500 InternalServerError "Internal Server Error";
}

impl Default for StatusCode {
    #[inline]
    fn default() -> Self {
        Self::Ok
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("StatusCode").field(&self.as_str()).finish()
    }
}
