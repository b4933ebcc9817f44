//! Run orchestrator.

use std::path::{Path, PathBuf};

use drill_config::DrillConfig;
use drill_core::enums::{PreamblePolicy, Side};
use drill_core::ids::ArtifactMatcher;
use drill_core::responses::{SkippedDocument, SyncReport};
use drill_core::store::{DeckStore, Scope};
use drill_render::{CardDraft, Notation, Rasterizer, RenderContext, render_line};
use drill_study::{StudyError, TreeBuilder, extract_lines, parse_study};
use tracing::{debug, info, warn};

use crate::apply::apply;
use crate::error::SyncError;
use crate::plan::{PatchSet, Snapshot, plan};

/// Settings of one run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub scope: Scope,
    /// Side whose moves are drilled.
    pub side: Side,
    pub preamble: PreamblePolicy,
    pub render: RenderContext,
    /// Artifact namespace.
    pub namespace: String,
}

impl SyncOptions {
    /// Options for syncing `deck` as `side` under `config`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` if the configuration is invalid.
    pub fn from_config(config: &DrillConfig, deck: &str, side: Side) -> Result<Self, SyncError> {
        config.validate()?;
        let notation = Notation::new(&config.render.pieces)
            .map_err(|e| SyncError::Config(e.to_string()))?;
        Ok(Self {
            scope: Scope::new(deck, config.deck.notetype.clone()),
            side,
            preamble: config.render.preamble,
            render: RenderContext::new(notation),
            namespace: config.store.namespace.clone(),
        })
    }
}

/// Drafts rendered from a set of documents.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub drafts: Vec<CardDraft>,
    pub skipped: Vec<SkippedDocument>,
}

/// A patch computed without applying it.
#[derive(Debug, Clone, Default)]
pub struct Planned {
    pub patch: PatchSet,
    pub skipped: Vec<SkippedDocument>,
}

impl Planned {
    /// The report applying the patch would produce.
    #[must_use]
    pub fn report(&self) -> SyncReport {
        SyncReport {
            skipped_documents: self.skipped.clone(),
            ..self.patch.projected()
        }
    }
}

/// Keeps one deck in sync with a set of study documents.
pub struct SyncEngine<S, R> {
    store: S,
    rasterizer: R,
    options: SyncOptions,
    matcher: ArtifactMatcher,
}

impl<S: DeckStore, R: Rasterizer> SyncEngine<S, R> {
    /// # Errors
    ///
    /// Returns `SyncError::Config` if the namespace cannot be matched.
    pub fn new(store: S, rasterizer: R, options: SyncOptions) -> Result<Self, SyncError> {
        let matcher = ArtifactMatcher::new(&options.namespace)
            .map_err(|e| SyncError::Config(format!("namespace '{}': {e}", options.namespace)))?;
        Ok(Self {
            store,
            rasterizer,
            options,
            matcher,
        })
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Bring the deck in sync with `paths`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` before touching the store if the deck or
    /// note type is unknown, and `SyncError::Store` if a store operation
    /// fails. Unreadable or malformed documents are skipped and listed in
    /// the report.
    pub async fn run(&self, paths: &[PathBuf]) -> Result<SyncReport, SyncError> {
        let planned = self.plan_only(paths).await?;
        let mut report = apply(
            &planned.patch,
            &self.store,
            &self.rasterizer,
            &self.options.scope,
            &self.options.namespace,
        )
        .await?;
        report.skipped_documents = planned.skipped;

        info!(
            deck = %self.options.scope.deck,
            inserted = report.inserted,
            updated = report.updated,
            deleted = report.deleted,
            diagrams_created = report.diagrams_created,
            diagrams_deleted = report.diagrams_deleted,
            skipped = report.skipped_documents.len(),
            "sync finished"
        );
        Ok(report)
    }

    /// Compute the patch for `paths` without applying it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run`], minus the write failures.
    pub async fn plan_only(&self, paths: &[PathBuf]) -> Result<Planned, SyncError> {
        self.store.check_scope(&self.options.scope).await?;
        let rendered = self.preview(paths).await?;
        let snapshot =
            Snapshot::take(&self.store, &self.options.scope, &self.options.namespace).await?;
        let patch = plan(&rendered.drafts, &snapshot, &self.matcher)?;
        Ok(Planned {
            patch,
            skipped: rendered.skipped,
        })
    }

    /// Read, merge, and render `paths` without touching the store.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Invariant` on an internal consistency fault.
    pub async fn preview(&self, paths: &[PathBuf]) -> Result<Rendered, SyncError> {
        let mut builder = TreeBuilder::new();
        let mut skipped = Vec::new();

        for path in paths {
            match ingest(&mut builder, path).await {
                Ok(()) => {}
                Err(e) if e.is_document_error() => {
                    warn!(path = %path.display(), error = %e, "skipping study");
                    skipped.push(SkippedDocument {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        let documents = builder.documents();
        let table = builder.finish();
        let lines = extract_lines(&table, self.options.side, self.options.preamble)?;
        let drafts = lines
            .iter()
            .map(|line| render_line(line, &self.options.render))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            documents,
            positions = table.len(),
            cards = drafts.len(),
            "rendered studies"
        );
        Ok(Rendered { drafts, skipped })
    }
}

async fn ingest(builder: &mut TreeBuilder, path: &Path) -> Result<(), StudyError> {
    let bytes = tokio::fs::read(path).await?;
    let events = parse_study(&bytes)?;
    builder.ingest(&path.display().to_string(), &events)?;
    debug!(path = %path.display(), events = events.len(), "ingested study");
    Ok(())
}
