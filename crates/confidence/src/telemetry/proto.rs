// @generated
// This file is @generated by prost-build from proto/telemetry.proto.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Monitoring {
    #[prost(message, repeated, tag = "1")]
    pub library_traces: ::prost::alloc::vec::Vec<LibraryTraces>,
    #[prost(enumeration = "Platform", tag = "2")]
    pub platform: i32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LibraryTraces {
    #[prost(enumeration = "library_traces::Library", tag = "1")]
    pub library: i32,
    #[prost(string, tag = "2")]
    pub library_version: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub traces: ::prost::alloc::vec::Vec<library_traces::Trace>,
}
/// Nested message and enum types in `LibraryTraces`.
pub mod library_traces {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Trace {
        #[prost(enumeration = "TraceId", tag = "1")]
        pub id: i32,
        #[prost(oneof = "trace::Trace", tags = "3")]
        pub trace: ::core::option::Option<trace::Trace>,
    }
    /// Nested message and enum types in `Trace`.
    pub mod trace {
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct RequestTrace {
            #[prost(uint64, tag = "1")]
            pub millisecond_duration: u64,
            #[prost(enumeration = "request_trace::Status", tag = "2")]
            pub status: i32,
        }
        /// Nested message and enum types in `RequestTrace`.
        pub mod request_trace {
            #[derive(
                Clone,
                Copy,
                Debug,
                PartialEq,
                Eq,
                Hash,
                PartialOrd,
                Ord,
                ::prost::Enumeration
            )]
            #[repr(i32)]
            pub enum Status {
                Unspecified = 0,
                Success = 1,
                Error = 2,
                Timeout = 3,
                Cached = 4,
            }
            impl Status {
                /// String value of the enum field names used in the ProtoBuf definition.
                pub fn as_str_name(&self) -> &'static str {
                    match self {
                        Self::Unspecified => "STATUS_UNSPECIFIED",
                        Self::Success => "STATUS_SUCCESS",
                        Self::Error => "STATUS_ERROR",
                        Self::Timeout => "STATUS_TIMEOUT",
                        Self::Cached => "STATUS_CACHED",
                    }
                }
            }
        }
        #[derive(Clone, Copy, PartialEq, ::prost::Oneof)]
        pub enum Trace {
            #[prost(message, tag = "3")]
            RequestTrace(RequestTrace),
        }
    }
    #[derive(
        Clone,
        Copy,
        Debug,
        PartialEq,
        Eq,
        Hash,
        PartialOrd,
        Ord,
        ::prost::Enumeration
    )]
    #[repr(i32)]
    pub enum Library {
        Unspecified = 0,
        Confidence = 1,
        OpenFeature = 2,
        React = 3,
    }
    impl Library {
        /// String value of the enum field names used in the ProtoBuf definition.
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Self::Unspecified => "LIBRARY_UNSPECIFIED",
                Self::Confidence => "LIBRARY_CONFIDENCE",
                Self::OpenFeature => "LIBRARY_OPEN_FEATURE",
                Self::React => "LIBRARY_REACT",
            }
        }
    }
    #[derive(
        Clone,
        Copy,
        Debug,
        PartialEq,
        Eq,
        Hash,
        PartialOrd,
        Ord,
        ::prost::Enumeration
    )]
    #[repr(i32)]
    pub enum TraceId {
        Unspecified = 0,
        ResolveLatency = 1,
        StaleFlag = 2,
        FlagTypeMismatch = 3,
        WithContext = 4,
    }
    impl TraceId {
        /// String value of the enum field names used in the ProtoBuf definition.
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Self::Unspecified => "TRACE_ID_UNSPECIFIED",
                Self::ResolveLatency => "TRACE_ID_RESOLVE_LATENCY",
                Self::StaleFlag => "TRACE_ID_STALE_FLAG",
                Self::FlagTypeMismatch => "TRACE_ID_FLAG_TYPE_MISMATCH",
                Self::WithContext => "TRACE_ID_WITH_CONTEXT",
            }
        }
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Platform {
    Unspecified = 0,
    Java = 1,
    Kotlin = 2,
    Swift = 3,
    JsWeb = 4,
    JsServer = 5,
    Python = 6,
    Go = 7,
    Ruby = 8,
    Rust = 9,
}
impl Platform {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unspecified => "PLATFORM_UNSPECIFIED",
            Self::Java => "PLATFORM_JAVA",
            Self::Kotlin => "PLATFORM_KOTLIN",
            Self::Swift => "PLATFORM_SWIFT",
            Self::JsWeb => "PLATFORM_JS_WEB",
            Self::JsServer => "PLATFORM_JS_SERVER",
            Self::Python => "PLATFORM_PYTHON",
            Self::Go => "PLATFORM_GO",
            Self::Ruby => "PLATFORM_RUBY",
            Self::Rust => "PLATFORM_RUST",
        }
    }
}
