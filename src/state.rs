//! # Preview State Module
//!
//! Questo modulo gestisce l'elenco ordinato delle immagini accettate per il form.
//!
//! ## Responsabilità:
//! - Mantiene l'ordine di inserimento (determina l'indice `imagen_<i>` all'invio)
//! - Garantisce che la lunghezza non superi mai `max_images`
//! - Assegna un `CandidateId` stabile per la rimozione da parte dell'utente
//! - Fornisce uno snapshot dei candidati prima di ogni punto di sospensione
//!
//! ## Ciclo di vita:
//! - Creato all'inizializzazione del form (`FormSession::new`)
//! - Ripulito dopo un invio riuscito (dopo il ritardo di reset) o con `reset`
//! - Nessuna persistenza: vive solo per la sessione corrente

use crate::candidate::ImageCandidate;
use crate::error::UploadError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an accepted candidate within one `PreviewState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered, capacity-bounded collection of accepted candidates
#[derive(Debug)]
pub struct PreviewState {
    entries: Vec<(CandidateId, ImageCandidate)>,
    max_images: usize,
    next_id: u64,
}

impl PreviewState {
    pub fn new(max_images: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_images,
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_images(&self) -> usize {
        self.max_images
    }

    /// How many more candidates fit
    pub fn remaining_capacity(&self) -> usize {
        self.max_images.saturating_sub(self.entries.len())
    }

    /// Append a candidate at the end.
    ///
    /// Fails with `CapacityExceeded` when the state is full; constraint checks
    /// on the candidate itself belong to the validator.
    pub fn push(&mut self, candidate: ImageCandidate) -> Result<CandidateId, UploadError> {
        if self.entries.len() >= self.max_images {
            return Err(UploadError::CapacityExceeded {
                current: self.entries.len(),
                incoming: 1,
                max: self.max_images,
            });
        }

        let id = CandidateId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, candidate));
        Ok(id)
    }

    /// Remove by identity; later entries shift down one index
    pub fn remove(&mut self, id: CandidateId) -> Option<ImageCandidate> {
        let index = self.entries.iter().position(|(entry_id, _)| *entry_id == id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, id: CandidateId) -> Option<&ImageCandidate> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, candidate)| candidate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageCandidate> {
        self.entries.iter().map(|(_, candidate)| candidate)
    }

    /// Owned copy of the candidates in index order
    pub fn snapshot(&self) -> Vec<ImageCandidate> {
        self.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
