//! Artifact directory layout and interface persistence.
//!
//! Compiled artifacts live under
//! `<project>/lumen-stuff/build-artifacts/<compiler-version>/<author>/<project>/`,
//! one `.lumi` interface and one `.lumo` object file per module, named by
//! the dotted module name. The compiler version namespaces the tree so a
//! toolchain upgrade invalidates everything at once.
//!
//! Freshness is decided from mtimes alone: an interface file is fresh iff
//! it exists and its mtime is at least the source file's mtime.

use std::path::{Path, PathBuf};

use lumen_core::interface::Interface;
use lumen_core::module::{Location, ModuleId};
use lumen_util::errors::{BuildError, BuildResult};

/// Extension of persisted interface files.
pub const INTERFACE_EXT: &str = "lumi";
/// Extension of persisted object files.
pub const OBJECT_EXT: &str = "lumo";

/// Handle to one compiler version's artifact tree.
#[derive(Debug, Clone)]
pub struct ArtifactRoot {
    dir: PathBuf,
}

impl ArtifactRoot {
    /// Artifact root for a project and compiler version.
    pub fn new(project_dir: &Path, compiler_version: &str) -> Self {
        Self {
            dir: lumen_util::stuff_dir(project_dir)
                .join("build-artifacts")
                .join(compiler_version),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn package_dir(&self, id: &ModuleId) -> PathBuf {
        self.dir.join(&id.package.author).join(&id.package.project)
    }

    /// Path of a module's persisted interface file.
    pub fn interface_path(&self, id: &ModuleId) -> PathBuf {
        self.package_dir(id)
            .join(format!("{}.{INTERFACE_EXT}", id.name))
    }

    /// Path of a module's persisted object file.
    pub fn object_path(&self, id: &ModuleId) -> PathBuf {
        self.package_dir(id).join(format!("{}.{OBJECT_EXT}", id.name))
    }

    /// Load a module's interface if its artifact is fresh.
    ///
    /// Native modules always yield their synthetic interface. Otherwise
    /// fresh means `mtime(interface) >= mtime(source)`; a fresh file that
    /// cannot be read back surfaces [`BuildError::CorruptedArtifact`].
    pub fn load_interface_if_fresh(
        &self,
        id: &ModuleId,
        location: &Location,
    ) -> BuildResult<Option<Interface>> {
        if location.native {
            return Ok(Some(Interface::native()));
        }

        let iface_path = self.interface_path(id);
        let (src_mtime, iface_mtime) = match (
            lumen_util::fs::mtime(&location.source),
            lumen_util::fs::mtime(&iface_path),
        ) {
            (Some(s), Some(i)) => (s, i),
            _ => return Ok(None),
        };
        if iface_mtime < src_mtime {
            return Ok(None);
        }

        match std::fs::read(&iface_path) {
            Ok(bytes) => Ok(Some(Interface::from_bytes(bytes))),
            Err(_) => Err(BuildError::CorruptedArtifact { path: iface_path }.into()),
        }
    }

    /// Persist a module's compiled interface and object.
    ///
    /// The object is written before the interface, so a fresh interface on
    /// disk implies its object exists. Each module owns a disjoint pair of
    /// filenames, so concurrent workers never collide.
    pub fn write_module(
        &self,
        id: &ModuleId,
        iface: &Interface,
        object: &[u8],
    ) -> Result<(), BuildError> {
        lumen_util::fs::ensure_dir(self.package_dir(id))?;
        std::fs::write(self.object_path(id), object)?;
        std::fs::write(self.interface_path(id), iface.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::module::PackageId;
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    fn module(name: &str) -> ModuleId {
        ModuleId::new(PackageId::new("acme", "todomvc"), name)
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options()
            .append(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn paths_follow_layout() {
        let root = ArtifactRoot::new(Path::new("/proj"), "0.9.0");
        let id = module("Json.Decode");
        assert_eq!(
            root.interface_path(&id),
            Path::new("/proj/lumen-stuff/build-artifacts/0.9.0/acme/todomvc/Json.Decode.lumi")
        );
        assert_eq!(
            root.object_path(&id),
            Path::new("/proj/lumen-stuff/build-artifacts/0.9.0/acme/todomvc/Json.Decode.lumo")
        );
    }

    #[test]
    fn write_then_load_roundtrips() {
        let tmp = tempfile::tempdir().unwrap();
        let root = ArtifactRoot::new(tmp.path(), "0.9.0");
        let id = module("Main");

        let src = tmp.path().join("Main.lum");
        std::fs::write(&src, "module Main").unwrap();

        let iface = Interface::from_bytes(b"iface".to_vec());
        root.write_module(&id, &iface, b"object").unwrap();

        let loaded = root
            .load_interface_if_fresh(&id, &Location::compilable(&src))
            .unwrap();
        assert_eq!(loaded, Some(iface));
        assert_eq!(std::fs::read(root.object_path(&id)).unwrap(), b"object");
    }

    #[test]
    fn missing_interface_is_not_fresh() {
        let tmp = tempfile::tempdir().unwrap();
        let root = ArtifactRoot::new(tmp.path(), "0.9.0");
        let src = tmp.path().join("Main.lum");
        std::fs::write(&src, "module Main").unwrap();

        let loaded = root
            .load_interface_if_fresh(&module("Main"), &Location::compilable(&src))
            .unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn touched_source_invalidates_interface() {
        let tmp = tempfile::tempdir().unwrap();
        let root = ArtifactRoot::new(tmp.path(), "0.9.0");
        let id = module("Main");

        let src = tmp.path().join("Main.lum");
        std::fs::write(&src, "module Main").unwrap();
        root.write_module(&id, &Interface::from_bytes(b"i".to_vec()), b"o")
            .unwrap();

        // Source edited after the interface was written.
        let later = SystemTime::now() + Duration::from_secs(60);
        set_mtime(&src, later);

        let loaded = root
            .load_interface_if_fresh(&id, &Location::compilable(&src))
            .unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn equal_mtimes_count_as_fresh() {
        let tmp = tempfile::tempdir().unwrap();
        let root = ArtifactRoot::new(tmp.path(), "0.9.0");
        let id = module("Main");

        let src = tmp.path().join("Main.lum");
        std::fs::write(&src, "module Main").unwrap();
        root.write_module(&id, &Interface::from_bytes(b"i".to_vec()), b"o")
            .unwrap();

        let instant = SystemTime::now();
        set_mtime(&src, instant);
        set_mtime(&root.interface_path(&id), instant);

        let loaded = root
            .load_interface_if_fresh(&id, &Location::compilable(&src))
            .unwrap();
        assert!(loaded.is_some());
    }

    #[test]
    fn native_modules_always_load() {
        let tmp = tempfile::tempdir().unwrap();
        let root = ArtifactRoot::new(tmp.path(), "0.9.0");
        let loaded = root
            .load_interface_if_fresh(
                &module("Native.Scheduler"),
                &Location::native("nowhere/Scheduler.js"),
            )
            .unwrap();
        assert_eq!(loaded, Some(Interface::native()));
    }
}
