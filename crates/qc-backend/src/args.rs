use std::path::PathBuf;

///
/// PortSpec
///
/// `--port=auto|<n>`: either let the supervisor pick an ephemeral
/// port, or bind the one given.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PortSpec {
    Auto,
    Fixed(u16),
}

///
/// LogLevel
///
/// `--log-level={d|i|w|e|s}`: the one-letter backend log-level
/// codes, not to be confused with this crate's own `tracing` level.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Debug => 'd',
            Self::Info => 'i',
            Self::Warn => 'w',
            Self::Error => 'e',
            Self::Silent => 's',
        }
    }

    #[must_use]
    pub const fn from_code(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Debug),
            'i' => Some(Self::Info),
            'w' => Some(Self::Warn),
            'e' => Some(Self::Error),
            's' => Some(Self::Silent),
            _ => None,
        }
    }
}

///
/// EmitServerStatus
///
/// `--emit-server-status=<path|fd:N>`: the supervisor reads the
/// child's `READY=` line from either a file path or an already-open file
/// descriptor number.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EmitServerStatus {
    Path(PathBuf),
    Fd(u32),
}

///
/// BackendProcessArgs
///
/// The typed CLI surface a supervisor populates to launch the backend
/// process. Parsing itself is out of scope here — this crate adds no
/// argument-parsing dependency — so construction is purely
/// programmatic; a CLI front-end embedding this crate owns translating its
/// own flags into this struct.
///

#[derive(Clone, Debug)]
pub struct BackendProcessArgs {
    pub bootstrap_only: bool,
    pub bootstrap_command: Option<String>,
    pub port: PortSpec,
    pub temp_dir: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub runstate_dir: Option<PathBuf>,
    pub backend_dsn: Option<String>,
    pub tenant_id: Option<String>,
    pub max_backend_connections: Option<u32>,
    pub emit_server_status: Option<EmitServerStatus>,
    pub generate_self_signed_cert: bool,
    pub allow_insecure_http_clients: bool,
    pub log_level: LogLevel,
}

impl BackendProcessArgs {
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            bootstrap_only: false,
            bootstrap_command: None,
            port: PortSpec::Auto,
            temp_dir: None,
            data_dir,
            runstate_dir: None,
            backend_dsn: None,
            tenant_id: None,
            max_backend_connections: None,
            emit_server_status: None,
            generate_self_signed_cert: false,
            allow_insecure_http_clients: false,
            log_level: LogLevel::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('d', LogLevel::Debug)]
    #[case('e', LogLevel::Error)]
    #[case('s', LogLevel::Silent)]
    fn log_level_round_trips_through_its_code(#[case] c: char, #[case] expected: LogLevel) {
        assert_eq!(LogLevel::from_code(c), Some(expected));
        assert_eq!(expected.code(), c);
    }

    #[test]
    fn unknown_log_level_code_is_rejected() {
        assert_eq!(LogLevel::from_code('z'), None);
    }

    #[test]
    fn new_defaults_to_auto_port_and_info_logging() {
        let args = BackendProcessArgs::new(PathBuf::from("/var/lib/qc"));
        assert_eq!(args.port, PortSpec::Auto);
        assert_eq!(args.log_level, LogLevel::Info);
    }
}
