//! Template catalog: built-ins plus custom JSON files, keyed by id.

use std::fs;
use std::path::{Component, Path, PathBuf};

use super::{ThumbnailTemplate, builtin_templates};
use crate::error::{Result, ThumbError};
use crate::output::write_atomic;

/// Outcome of scanning a templates directory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    /// Ids inserted into the catalog, in load order.
    pub loaded: Vec<String>,
    /// Files that failed to read, parse or validate, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Parse and validate one template file.
pub fn load_template_file(path: &Path) -> Result<ThumbnailTemplate> {
    let data = fs::read_to_string(path)?;
    let mut template: ThumbnailTemplate = serde_json::from_str(&data)?;
    template.normalize();
    template.validate()?;
    Ok(template)
}

/// True when `name` is one normal path component, so joining it onto the
/// catalog directory stays inside that directory.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Ordered template store. Ids are unique; inserting an existing id
/// replaces that entry in place.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    dir: PathBuf,
    templates: Vec<ThumbnailTemplate>,
}

impl TemplateCatalog {
    /// Built-in templates only, saving into `dir`.
    pub fn with_builtins(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            templates: builtin_templates(),
        }
    }

    /// Built-ins overlaid with every custom template found in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut catalog = Self::with_builtins(dir);
        let dir = catalog.dir.clone();
        catalog.load_custom(&dir);
        catalog
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThumbnailTemplate> {
        self.templates.iter()
    }

    /// `(id, display name)` pairs in catalog order.
    pub fn list_templates(&self) -> Vec<(&str, &str)> {
        self.templates
            .iter()
            .map(|t| (t.id.as_str(), t.name.as_str()))
            .collect()
    }

    pub fn get_template(&self, id: &str) -> Option<&ThumbnailTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// First template whose display name matches.
    pub fn get_template_by_name(&self, name: &str) -> Option<&ThumbnailTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Insert or replace by id. Returns the template it replaced.
    pub fn insert(&mut self, template: ThumbnailTemplate) -> Option<ThumbnailTemplate> {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(slot) => Some(std::mem::replace(slot, template)),
            None => {
                self.templates.push(template);
                None
            }
        }
    }

    /// Load every `*.json` file in `dir`, in file name order.
    ///
    /// A missing directory is created and yields an empty report. Files that
    /// fail are skipped with a warning; the rest still load. Later files win
    /// over earlier ones and over built-ins with the same id.
    pub fn load_custom(&mut self, dir: &Path) -> LoadReport {
        let mut report = LoadReport::default();

        if !dir.exists() {
            if let Err(e) = fs::create_dir_all(dir) {
                log::warn!("cannot create templates directory {}: {}", dir.display(), e);
            }
            return report;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("cannot read templates directory {}: {}", dir.display(), e);
                return report;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        for path in files {
            match load_template_file(&path) {
                Ok(template) => {
                    let id = template.id.clone();
                    if self.insert(template).is_some() {
                        log::debug!("template '{}' overridden by {}", id, path.display());
                    }
                    report.loaded.push(id);
                }
                Err(e) => {
                    log::warn!("skipping template {}: {}", path.display(), e);
                    report.skipped.push((path, e.to_string()));
                }
            }
        }

        report
    }

    /// Serialize `template` into the catalog directory.
    ///
    /// `filename` defaults to `<id>.json`. Returns the written path.
    pub fn save_template(
        &self,
        template: &ThumbnailTemplate,
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        template.validate()?;

        let filename = match filename {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            Some(_) => {
                return Err(ThumbError::Template("empty template file name".to_string()));
            }
            None => format!("{}.json", template.id),
        };
        if !is_plain_file_name(&filename) {
            return Err(ThumbError::Template(format!(
                "template file name '{}' must not contain a directory",
                filename
            )));
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        let json = serde_json::to_string_pretty(template)?;
        write_atomic(&path, json.as_bytes())?;

        log::info!("saved template '{}' to {}", template.id, path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::BUILTIN_IDS;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtins_listed_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TemplateCatalog::with_builtins(dir.path());
        let ids: Vec<&str> = catalog.list_templates().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, BUILTIN_IDS);
    }

    #[test]
    fn test_get_by_id_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TemplateCatalog::with_builtins(dir.path());
        assert_eq!(catalog.get_template("live").unwrap().name, "LIVE告知");
        assert_eq!(catalog.get_template_by_name("MV公開").unwrap().id, "mv");
        assert!(catalog.get_template("nope").is_none());
        assert!(catalog.get_template_by_name("nope").is_none());
    }

    #[test]
    fn test_missing_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates");
        let catalog = TemplateCatalog::new(&templates);
        assert!(templates.is_dir());
        assert_eq!(catalog.len(), BUILTIN_IDS.len());
    }

    #[test]
    fn test_custom_overrides_builtin_in_place() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("cover.json"),
            r#"{"id": "cover", "name": "My Cover"}"#,
        )
        .unwrap();

        let catalog = TemplateCatalog::new(dir.path());
        assert_eq!(catalog.len(), BUILTIN_IDS.len());
        assert_eq!(catalog.list_templates()[1], ("cover", "My Cover"));
        assert!(catalog.get_template("cover").unwrap().text_elements.is_empty());
    }

    #[test]
    fn test_last_loaded_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"id": "x", "name": "First"}"#).unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{"id": "x", "name": "Second"}"#).unwrap();

        let mut catalog = TemplateCatalog::with_builtins(dir.path());
        let report = catalog.load_custom(dir.path());
        assert_eq!(report.loaded, vec!["x", "x"]);
        assert_eq!(catalog.get_template("x").unwrap().name, "Second");
        assert_eq!(catalog.len(), BUILTIN_IDS.len() + 1);
    }

    #[test]
    fn test_bad_file_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        std::fs::write(
            dir.path().join("bad_color.json"),
            r##"{"id": "c", "name": "C", "background_color": "blue"}"##,
        )
        .unwrap();
        std::fs::write(dir.path().join("good.json"), r#"{"id": "good", "name": "Good"}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut catalog = TemplateCatalog::with_builtins(dir.path());
        let report = catalog.load_custom(dir.path());

        assert_eq!(report.loaded, vec!["good"]);
        assert_eq!(report.skipped.len(), 2);
        assert!(catalog.get_template("good").is_some());
        assert!(catalog.get_template("c").is_none());
        assert!(catalog.get_template("new_song").is_some());
    }

    #[test]
    fn test_save_default_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TemplateCatalog::with_builtins(dir.path().join("out"));
        let template = catalog.get_template("mv").unwrap();

        let path = catalog.save_template(template, None).unwrap();
        assert_eq!(path, dir.path().join("out").join("mv.json"));

        let reloaded = load_template_file(&path).unwrap();
        assert_eq!(&reloaded, template);
    }

    #[test]
    fn test_save_round_trip_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TemplateCatalog::with_builtins(dir.path());

        for (id, _) in catalog.list_templates() {
            let template = catalog.get_template(id).unwrap();
            let first = catalog.save_template(template, Some("first.json")).unwrap();
            let reloaded = load_template_file(&first).unwrap();
            let second = catalog.save_template(&reloaded, Some("second.json")).unwrap();

            let a: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&first).unwrap()).unwrap();
            let b: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&second).unwrap()).unwrap();
            assert_eq!(a, b, "round trip changed template '{}'", id);
        }
    }

    #[test]
    fn test_save_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TemplateCatalog::with_builtins(dir.path());
        let bad = ThumbnailTemplate::new("", "Nameless id");
        assert!(catalog.save_template(&bad, None).is_err());
    }

    #[test]
    fn test_save_rejects_paths_outside_dir() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates");
        let catalog = TemplateCatalog::with_builtins(&templates);
        let template = catalog.get_template("live").unwrap();

        for name in ["../escape.json", "nested/live.json", "/tmp/live.json", "..", "a\\b.json"] {
            assert!(catalog.save_template(template, Some(name)).is_err(), "{}", name);
        }
        assert!(!dir.path().join("escape.json").exists());

        let path = catalog.save_template(template, Some("live_copy.json")).unwrap();
        assert_eq!(path, templates.join("live_copy.json"));
    }
}
