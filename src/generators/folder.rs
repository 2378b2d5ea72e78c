//! Folder name generator.

use super::filename::{render_template, TemplateFields};
use crate::models::config::TemplateConfig;

/// Generate the per-movie folder name.
///
/// Falls back to the video's own stem when the template renders empty,
/// so a movie never lands directly in the output root by accident.
pub fn generate_movie_folder(
    templates: &TemplateConfig,
    fields: &TemplateFields,
    fallback_stem: &str,
) -> String {
    let folder_fields = TemplateFields {
        cd: None,
        ..fields.clone()
    };
    let name = render_template(&templates.folder, &folder_fields);
    if name.is_empty() {
        fallback_stem.to_string()
    } else {
        name
    }
}
