//! Recording path remapping for direct file access.

use crate::config::Configuration;

/// Rewrites backend-reported recording paths for the host.
///
/// Paths are only exposed at all when direct access is enabled. With
/// substitution configured, the local prefix is replaced by the remote
/// prefix as a literal substring; separators are not normalized and
/// partial segments are not matched specially.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct RecordingPathMapper {
    enabled: bool,
    substitution: Option<(String, String)>,
}

impl RecordingPathMapper {
    /// Builds a mapper from the configuration snapshot.
    #[must_use]
    pub fn new(config: &Configuration) -> Self {
        let substitution = config.requires_path_substitution.then(|| {
            (
                config.local_file_path.clone(),
                config.remote_file_path.clone(),
            )
        });
        Self {
            enabled: config.enable_direct_access,
            substitution,
        }
    }

    /// Maps a backend file name to a host-accessible path.
    ///
    /// `None` when direct access is disabled.
    #[must_use]
    pub fn map(&self, file_name: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        match &self.substitution {
            Some((local, remote)) => Some(file_name.replace(local.as_str(), remote)),
            None => Some(String::from(file_name)),
        }
    }
}
