//! Fields shared by every component record

use crate::error::Result;
use crate::export::{ExportContainer, ExportMapping, Exportable};
use crate::io::{AssetReader, AssetWriter};
use crate::version::{FormatVersion, TransferFlags};

use super::Dependency;
use super::pptr::{GameObject, Object, PPtr, Prefab};

/// Hide flags are serialized only in editor data.
pub fn has_hide_flags(flags: TransferFlags) -> bool {
    !flags.is_release()
}

/// Prefab source and instance links are serialized only in editor data.
pub fn has_prefab_links(flags: TransferFlags) -> bool {
    !flags.is_release()
}

/// The prefab asset link: 2018.3 and later, editor data only.
pub fn has_prefab_asset(version: FormatVersion, flags: TransferFlags) -> bool {
    version.is_at_least(FormatVersion::series(2018, 3)) && has_prefab_links(flags)
}

/// Prefab links were renamed in 2018.3.
fn has_new_prefab_names(version: FormatVersion) -> bool {
    version.is_at_least(FormatVersion::series(2018, 3))
}

/// Object, editor extension and component prefix of a component record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommonFields {
    pub hide_flags: u32,
    /// `m_CorrespondingSourceObject`, `m_PrefabParentObject` before 2018.3.
    pub source_object: PPtr<Object>,
    /// `m_PrefabInstance`, `m_PrefabInternal` before 2018.3.
    pub prefab_instance: PPtr<Prefab>,
    pub prefab_asset: PPtr<Prefab>,
    pub game_object: PPtr<GameObject>,
}

impl CommonFields {
    pub fn read(reader: &mut AssetReader<'_>) -> Result<Self> {
        let (version, flags) = (reader.version(), reader.flags());
        let mut fields = Self::default();

        if has_hide_flags(flags) {
            fields.hide_flags = reader.read_u32()?;
        }
        if has_prefab_links(flags) {
            fields.source_object = PPtr::read(reader)?;
            fields.prefab_instance = PPtr::read(reader)?;
        }
        if has_prefab_asset(version, flags) {
            fields.prefab_asset = PPtr::read(reader)?;
        }
        fields.game_object = PPtr::read(reader)?;
        Ok(fields)
    }

    pub fn write(&self, writer: &mut AssetWriter) {
        let (version, flags) = (writer.version(), writer.flags());

        if has_hide_flags(flags) {
            writer.write_u32(self.hide_flags);
        }
        if has_prefab_links(flags) {
            self.source_object.write(writer);
            self.prefab_instance.write(writer);
        }
        if has_prefab_asset(version, flags) {
            self.prefab_asset.write(writer);
        }
        self.game_object.write(writer);
    }

    /// Non-null references held by the prefix.
    pub fn dependencies(&self) -> impl Iterator<Item = Dependency> + '_ {
        [
            Dependency::new("m_CorrespondingSourceObject", self.source_object),
            Dependency::new("m_PrefabInstance", self.prefab_instance.erase()),
            Dependency::new("m_PrefabAsset", self.prefab_asset.erase()),
            Dependency::new("m_GameObject", self.game_object.erase()),
        ]
        .into_iter()
        .filter(|dependency| !dependency.reference.is_null())
    }

    /// Start an export mapping with the prefix keys.
    pub fn export(&self, container: &ExportContainer) -> ExportMapping {
        let mut node = ExportMapping::new();

        node.add(
            "m_ObjectHideFlags",
            container.field(|_, f| has_hide_flags(f), self.hide_flags, 0),
        );
        let source_object = container.field(|_, f| has_prefab_links(f), self.source_object, PPtr::null());
        let prefab_instance = container.field(|_, f| has_prefab_links(f), self.prefab_instance, PPtr::null());
        if has_new_prefab_names(container.export_version()) {
            node.add("m_CorrespondingSourceObject", source_object.export(container));
            node.add("m_PrefabInstance", prefab_instance.export(container));
            node.add(
                "m_PrefabAsset",
                container.field(has_prefab_asset, self.prefab_asset, PPtr::null()).export(container),
            );
        } else {
            node.add("m_PrefabParentObject", source_object.export(container));
            node.add("m_PrefabInternal", prefab_instance.export(container));
        }
        node.add("m_GameObject", self.game_object.export(container));
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ExportNode, ExportOptions};
    use crate::io::Endian;
    use crate::version::Platform;

    fn sample() -> CommonFields {
        CommonFields {
            hide_flags: 2,
            source_object: PPtr::new(1, 10),
            prefab_instance: PPtr::new(0, 11),
            prefab_asset: PPtr::new(1, 12),
            game_object: PPtr::new(0, 13),
        }
    }

    fn encoded_len(version: &str, flags: TransferFlags) -> usize {
        let mut w = AssetWriter::new(Endian::Little, version.parse().unwrap(), flags);
        sample().write(&mut w);
        w.position()
    }

    #[test]
    fn test_release_data_has_only_game_object() {
        assert_eq!(encoded_len("2019.1.0f1", TransferFlags::SERIALIZE_GAME_RELEASE), 12);
        assert_eq!(encoded_len("4.7.2f1", TransferFlags::SERIALIZE_GAME_RELEASE), 8);
    }

    #[test]
    fn test_editor_data_prefab_asset_from_2018_3() {
        assert_eq!(encoded_len("2018.2.9f1", TransferFlags::empty()), 4 + 3 * 12);
        assert_eq!(encoded_len("2018.3.0f2", TransferFlags::empty()), 4 + 4 * 12);
    }

    #[test]
    fn test_read_matches_write() {
        let version: FormatVersion = "2018.3.0f2".parse().unwrap();
        let mut w = AssetWriter::new(Endian::Little, version, TransferFlags::empty());
        sample().write(&mut w);
        let bytes = w.into_bytes();
        let mut r = AssetReader::new(&bytes, Endian::Little, version, TransferFlags::empty());
        assert_eq!(CommonFields::read(&mut r).unwrap(), sample());
    }

    #[test]
    fn test_export_names_follow_export_version() {
        let source: FormatVersion = "2018.3.0f2".parse().unwrap();
        let old = ExportContainer::new(source, TransferFlags::empty(), Platform::Win, ExportOptions::new());
        let keys: Vec<String> = sample().export(&old).keys().map(str::to_string).collect();
        assert_eq!(
            keys,
            vec!["m_ObjectHideFlags", "m_PrefabParentObject", "m_PrefabInternal", "m_GameObject"]
        );

        let new = ExportContainer::new(
            source,
            TransferFlags::empty(),
            Platform::Win,
            ExportOptions::new().with_export_version(source),
        );
        let node = sample().export(&new);
        assert_eq!(node.get("m_PrefabAsset").and_then(|n| n.get("m_PathID")), Some(&ExportNode::Int(12)));
    }

    #[test]
    fn test_release_source_exports_defaults() {
        let container = ExportContainer::new(
            "2017.1.0f1".parse().unwrap(),
            TransferFlags::SERIALIZE_GAME_RELEASE,
            Platform::Android,
            ExportOptions::new(),
        );
        let node = sample().export(&container);
        assert_eq!(node.get("m_ObjectHideFlags"), Some(&ExportNode::UInt(0)));
        assert_eq!(node.get("m_PrefabInternal").and_then(|n| n.get("m_PathID")), Some(&ExportNode::Int(0)));
        assert_eq!(node.get("m_GameObject").and_then(|n| n.get("m_PathID")), Some(&ExportNode::Int(13)));
    }
}
