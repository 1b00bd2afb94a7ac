//! Export configuration

use crate::version::{FormatVersion, Platform, ReleaseType, TransferFlags};

/// Target of an export run.
///
/// # Example
///
/// ```
/// use rippercore::export::ExportOptions;
/// use rippercore::version::FormatVersion;
///
/// let options = ExportOptions::new()
///     .with_export_version(FormatVersion::release(2018, 3, 0));
/// assert_eq!(options.export_version.to_string(), "2018.3.0f1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Format version the exported tree is shaped for.
    /// Default: 2017.3.0f3
    pub export_version: FormatVersion,

    /// Flags of the exported tree. Exports are editor data by default.
    pub export_flags: TransferFlags,
}

impl ExportOptions {
    pub const DEFAULT_EXPORT_VERSION: FormatVersion =
        FormatVersion::new(2017, 3, 0, ReleaseType::Final, 3);

    #[must_use]
    pub fn new() -> Self {
        Self {
            export_version: Self::DEFAULT_EXPORT_VERSION,
            export_flags: TransferFlags::empty(),
        }
    }

    #[must_use]
    pub fn with_export_version(mut self, version: FormatVersion) -> Self {
        self.export_version = version;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: TransferFlags) -> Self {
        self.export_flags = flags;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-file export context: where the data came from and what it is exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportContainer {
    source_version: FormatVersion,
    source_flags: TransferFlags,
    platform: Platform,
    options: ExportOptions,
}

impl ExportContainer {
    pub fn new(
        source_version: FormatVersion,
        source_flags: TransferFlags,
        platform: Platform,
        options: ExportOptions,
    ) -> Self {
        Self {
            source_version,
            source_flags,
            platform,
            options,
        }
    }

    /// Version of the decoded data.
    pub fn version(&self) -> FormatVersion {
        self.source_version
    }

    pub fn flags(&self) -> TransferFlags {
        self.source_flags
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn export_version(&self) -> FormatVersion {
        self.options.export_version
    }

    pub fn export_flags(&self) -> TransferFlags {
        self.options.export_flags
    }

    /// Whether the exported version carries a field.
    pub fn exports(&self, gate: impl Fn(FormatVersion, TransferFlags) -> bool) -> bool {
        gate(self.export_version(), self.export_flags())
    }

    /// Pick the decoded value only when both the source and the export version
    /// carry the field; otherwise the field's documented default.
    pub fn field<T>(&self, gate: impl Fn(FormatVersion, TransferFlags) -> bool, value: T, default: T) -> T {
        if gate(self.source_version, self.source_flags) && gate(self.export_version(), self.export_flags()) {
            value
        } else {
            default
        }
    }
}
