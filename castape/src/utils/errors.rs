#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        if $level <= $state.fail_level {
            return Err($err);
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", $err),
                ::log::Level::Warn => ::log::warn!("{}", $err),
                ::log::Level::Info => ::log::info!("{}", $err),
                ::log::Level::Debug => ::log::debug!("{}", $err),
                ::log::Level::Trace => ::log::trace!("{}", $err),
            }
        }
    }};
}

#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error("Skipping unhandled data at offset {offset:#08x}")]
    UnalignedData { offset: usize },

    #[error("Truncated file type identifier at offset {offset:#08x}: using initial sync")]
    TruncatedTypeIdentifier { offset: usize },

    #[error("Unknown file type at offset {offset:#08x}: using long header")]
    UnknownBlockType { offset: usize },

    #[error("Failed writing audio data: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    struct State {
        fail_level: Level,
    }

    fn check(state: &State, offset: usize) -> Result<(), ScanError> {
        log_or_err!(state, Level::Warn, ScanError::UnalignedData { offset });
        Ok(())
    }

    #[test]
    fn fail_level_controls_escalation() {
        assert!(check(&State { fail_level: Level::Error }, 3).is_ok());

        let err = check(&State { fail_level: Level::Warn }, 3).unwrap_err();
        assert!(matches!(err, ScanError::UnalignedData { offset: 3 }));
        assert_eq!(err.to_string(), "Skipping unhandled data at offset 0x000003");
    }
}
