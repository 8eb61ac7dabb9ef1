use super::AppState;
use crate::embed::embed_reference;
use crate::models::{
    EntryId, HotspotSection, SaveContext, SaveOutcome, SectionSubmission, SectionSummary,
};

/// Only the main authoring window may change sections; preview windows are read-only.
fn save_context(window: &tauri::WebviewWindow, autosave: Option<bool>) -> SaveContext {
    SaveContext {
        authorized: window.label() == "main",
        autosave: autosave.unwrap_or(false),
    }
}

/// Lists all sections with their embed references, oldest first.
#[tauri::command]
pub(crate) fn list_sections(
    state: tauri::State<'_, AppState>,
) -> Result<Vec<SectionSummary>, String> {
    let sections = state.sections()?;
    sections.list().map_err(|e| e.to_string())
}

/// Creates an empty section and returns its id.
#[tauri::command]
pub(crate) fn create_section(
    state: tauri::State<'_, AppState>,
    title: String,
) -> Result<EntryId, String> {
    let mut sections = state.sections()?;
    sections.create(&title).map_err(|e| e.to_string())
}

#[tauri::command]
pub(crate) fn rename_section(
    state: tauri::State<'_, AppState>,
    id: EntryId,
    title: String,
) -> Result<(), String> {
    let mut sections = state.sections()?;
    sections.rename(id, &title).map_err(|e| e.to_string())
}

/// Deletes a section with its hotspots. Embeds pointing at it render nothing afterwards.
#[tauri::command]
pub(crate) fn delete_section(
    state: tauri::State<'_, AppState>,
    id: EntryId,
) -> Result<bool, String> {
    let mut sections = state.sections()?;
    sections.delete(id).map_err(|e| e.to_string())
}

#[tauri::command]
pub(crate) fn get_section(
    state: tauri::State<'_, AppState>,
    id: EntryId,
) -> Result<HotspotSection, String> {
    let sections = state.sections()?;
    sections.load(id).map_err(|e| e.to_string())
}

/// Saves a structured submission (image plus parallel row columns).
#[tauri::command]
pub(crate) fn save_section(
    window: tauri::WebviewWindow,
    state: tauri::State<'_, AppState>,
    id: EntryId,
    submission: SectionSubmission,
    autosave: Option<bool>,
) -> Result<SaveOutcome, String> {
    let context = save_context(&window, autosave);
    let mut sections = state.sections()?;
    sections.save(id, &submission, context).map_err(|e| e.to_string())
}

/// Saves the authoring form as posted, i.e. an urlencoded `hotspot_*` body.
#[tauri::command]
pub(crate) fn save_section_form(
    window: tauri::WebviewWindow,
    state: tauri::State<'_, AppState>,
    id: EntryId,
    body: String,
    autosave: Option<bool>,
) -> Result<SaveOutcome, String> {
    let context = save_context(&window, autosave);
    let submission = SectionSubmission::from_form_body(&body);
    let mut sections = state.sections()?;
    sections.save(id, &submission, context).map_err(|e| e.to_string())
}

/// Embeddable markup for one section; empty when it has nothing to show.
#[tauri::command]
pub(crate) fn render_section(
    state: tauri::State<'_, AppState>,
    id: EntryId,
) -> Result<String, String> {
    let sections = state.sections()?;
    Ok(sections.render(id))
}

/// Expands every `[hotspot id="N"]` reference inside a piece of content.
#[tauri::command]
pub(crate) fn render_content(
    state: tauri::State<'_, AppState>,
    content: String,
) -> Result<String, String> {
    let sections = state.sections()?;
    Ok(sections.expand(&content))
}

#[tauri::command]
pub(crate) fn authoring_form(
    state: tauri::State<'_, AppState>,
    id: EntryId,
) -> Result<String, String> {
    let sections = state.sections()?;
    sections.authoring_form(id).map_err(|e| e.to_string())
}

#[tauri::command]
pub(crate) fn embed_reference_for(id: EntryId) -> String {
    embed_reference(id)
}
