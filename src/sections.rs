//! Hotspot sections on top of a [`MetaStore`].
//!
//! Saves replace the whole record from the submitted form. Display paths
//! never fail: store errors are logged and render as nothing.

use crate::codec;
use crate::embed::{embed_reference, expand_embeds, parse_embed_reference};
use crate::error::StoreError;
use crate::models::{
    EntryId, HotspotSection, SaveContext, SaveOutcome, SectionSubmission, SectionSummary,
};
use crate::render::{render_authoring_form, render_display};
use crate::sanitize::{sanitize_text_field, sanitize_url};
use crate::store::{MetaStore, IMAGE_KEY, SPOTS_KEY, TITLE_KEY};

pub struct Sections<S> {
    store: S,
}

impl<S: MetaStore> Sections<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn ensure_exists(&self, id: EntryId) -> Result<(), StoreError> {
        if self.store.entry_ids()?.contains(&id) {
            Ok(())
        } else {
            Err(StoreError::MissingEntry(id))
        }
    }

    /// Creates an empty section: no image, no hotspots.
    pub fn create(&mut self, title: &str) -> Result<EntryId, StoreError> {
        let id = self.store.create_entry()?;
        self.store.set(id, TITLE_KEY, &sanitize_text_field(title))?;
        Ok(id)
    }

    pub fn rename(&mut self, id: EntryId, title: &str) -> Result<(), StoreError> {
        self.store.set(id, TITLE_KEY, &sanitize_text_field(title))
    }

    /// Deletes a section together with its hotspot data.
    pub fn delete(&mut self, id: EntryId) -> Result<bool, StoreError> {
        self.store.delete_entry(id)
    }

    pub fn list(&self) -> Result<Vec<SectionSummary>, StoreError> {
        self.store
            .entry_ids()?
            .into_iter()
            .map(|id| {
                Ok(SectionSummary {
                    id,
                    title: self.store.get(id, TITLE_KEY)?.unwrap_or_default(),
                    embed: embed_reference(id),
                    updated_at: self.store.updated_at(id)?,
                })
            })
            .collect()
    }

    /// Loads a section. A corrupt hotspot blob loads as "no hotspots".
    pub fn load(&self, id: EntryId) -> Result<HotspotSection, StoreError> {
        self.ensure_exists(id)?;
        Ok(HotspotSection {
            id,
            title: self.store.get(id, TITLE_KEY)?.unwrap_or_default(),
            image_url: self.store.get(id, IMAGE_KEY)?.unwrap_or_default(),
            spots: codec::decode(self.store.get(id, SPOTS_KEY)?.as_deref()),
        })
    }

    /// Applies one save of the authoring form.
    ///
    /// Nothing is written when the host denied the edit or the request is an
    /// autosave. Otherwise the image is replaced if the form carried one and
    /// the hotspot list is replaced as a whole if the rows were submitted.
    pub fn save(
        &mut self,
        id: EntryId,
        submission: &SectionSubmission,
        context: SaveContext,
    ) -> Result<SaveOutcome, StoreError> {
        if !context.authorized {
            log::warn!("section {}: save rejected, not authorized", id);
            return Ok(SaveOutcome::Unauthorized);
        }
        if context.autosave {
            log::debug!("section {}: autosave ignored", id);
            return Ok(SaveOutcome::Autosave);
        }
        self.ensure_exists(id)?;

        if let Some(image) = &submission.image {
            self.store.set(id, IMAGE_KEY, &sanitize_url(image))?;
        }

        if let Some(rows) = &submission.rows {
            let spots = codec::encode_rows(rows);
            log::info!(
                "section {}: saving {} hotspots from {} rows",
                id,
                spots.len(),
                rows.len()
            );
            self.store.set(id, SPOTS_KEY, &codec::to_blob(&spots))?;
        }

        Ok(SaveOutcome::Saved)
    }

    /// Authoring form for an existing section.
    pub fn authoring_form(&self, id: EntryId) -> Result<String, StoreError> {
        Ok(render_authoring_form(&self.load(id)?))
    }

    /// Embeddable markup for a section; empty when it cannot be shown.
    pub fn render(&self, id: EntryId) -> String {
        let image = self.store.get(id, IMAGE_KEY);
        let spots = self.store.get(id, SPOTS_KEY);
        match (image, spots) {
            (Ok(image), Ok(spots)) => render_display(
                image.as_deref().unwrap_or(""),
                &codec::decode(spots.as_deref()),
            ),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("section {}: could not be read, rendering nothing: {}", id, e);
                String::new()
            }
        }
    }

    /// Resolves a single embed reference such as `[hotspot id="3"]`.
    pub fn render_reference(&self, tag: &str) -> String {
        parse_embed_reference(tag)
            .map(|id| self.render(id))
            .unwrap_or_default()
    }

    /// Expands every embed reference inside a piece of content.
    pub fn expand(&self, content: &str) -> String {
        expand_embeds(content, |id| self.render(id))
    }
}
