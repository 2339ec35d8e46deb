//! crates/logging/src/config.rs
//! Verbosity configuration mapping `-v` counts to per-target levels.

use tracing::Level;

/// Subsystem targets emitted by the workspace.
pub const TARGETS: [&str; 6] = [
    "deltasync::index",
    "deltasync::delta",
    "deltasync::integrity",
    "deltasync::recv",
    "deltasync::stats",
    "deltasync::batch",
];

/// Per-target maximum levels derived from a verbosity count.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerbosityConfig {
    /// Level applied to targets outside the workspace.
    pub default: Level,
    /// Chunk index construction.
    pub index: Level,
    /// Delta scan, per packet.
    pub delta: Level,
    /// Weak checksum collisions.
    pub integrity: Level,
    /// Reconstruction.
    pub recv: Level,
    /// End-of-exchange statistics.
    pub stats: Level,
    /// Batch file I/O.
    pub batch: Level,
}

impl Default for VerbosityConfig {
    fn default() -> Self {
        Self::from_verbose_level(0)
    }
}

impl VerbosityConfig {
    /// Creates a configuration from a verbose level (0-3).
    ///
    /// Level 0 only reports warnings, level 1 adds statistics, level 2 adds
    /// per-stage debug output, and level 3 traces every emitted packet.
    #[must_use]
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self {
            default: Level::WARN,
            index: Level::WARN,
            delta: Level::WARN,
            integrity: Level::WARN,
            recv: Level::WARN,
            stats: Level::WARN,
            batch: Level::WARN,
        };

        if level >= 1 {
            config.stats = Level::INFO;
        }
        if level >= 2 {
            config.index = Level::DEBUG;
            config.recv = Level::DEBUG;
            config.batch = Level::DEBUG;
            config.delta = Level::DEBUG;
        }
        if level >= 3 {
            config.delta = Level::TRACE;
            config.default = Level::INFO;
        }
        config
    }

    /// Renders the configuration as an `EnvFilter` directive string.
    ///
    /// ```
    /// use logging::VerbosityConfig;
    ///
    /// let directives = VerbosityConfig::from_verbose_level(1).directives();
    /// assert!(directives.contains("deltasync::stats=info"));
    /// ```
    #[must_use]
    pub fn directives(&self) -> String {
        let levels = [
            self.index,
            self.delta,
            self.integrity,
            self.recv,
            self.stats,
            self.batch,
        ];
        let mut directives = level_name(self.default).to_owned();
        for (target, level) in TARGETS.iter().zip(levels) {
            directives.push(',');
            directives.push_str(target);
            directives.push('=');
            directives.push_str(level_name(level));
        }
        directives
    }
}

fn level_name(level: Level) -> &'static str {
    if level == Level::TRACE {
        "trace"
    } else if level == Level::DEBUG {
        "debug"
    } else if level == Level::INFO {
        "info"
    } else if level == Level::WARN {
        "warn"
    } else {
        "error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_level_keeps_integrity_warnings() {
        let config = VerbosityConfig::from_verbose_level(0);
        assert_eq!(config.integrity, Level::WARN);
        assert_eq!(config.stats, Level::WARN);
    }

    #[test]
    fn higher_levels_are_cumulative() {
        let two = VerbosityConfig::from_verbose_level(2);
        assert_eq!(two.stats, Level::INFO);
        assert_eq!(two.index, Level::DEBUG);

        let three = VerbosityConfig::from_verbose_level(3);
        assert_eq!(three.delta, Level::TRACE);
        assert_eq!(three.stats, Level::INFO);
    }

    #[test]
    fn directives_cover_every_target() {
        let directives = VerbosityConfig::from_verbose_level(2).directives();
        assert!(directives.starts_with("warn,"));
        for target in TARGETS {
            assert!(directives.contains(target), "missing {target}");
        }
        assert!(directives.contains("deltasync::delta=debug"));
    }
}
