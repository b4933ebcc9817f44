//! Card renderer.
//!
//! A study line becomes a [`CardDraft`]: the question and answer HTML, the
//! versioned line payload, the decision FEN, and the diagram descriptor. The
//! question embeds the diagram's artifact name, which contains the owning
//! record id, so the final [`CardFields`] are produced by
//! [`CardDraft::fields_for`] once that id exists.
//!
//! Question layout:
//!
//! ```text
//! <div class="preamble">root comments</div>
//! 1. e4 e5 2. Nf3 Nc6 <em>last move comment</em>
//! <br><img src="chess-opening-trainer-17-<sha1>.svg">
//! <br><span class="fen">FEN: <root FEN></span>
//! ```
//!
//! An answer move whose comments carry highlights gets its own diagram of the
//! position after it, embedded below that answer.

use drill_core::ids::{ArtifactName, RecordId};
use drill_core::payload::{CURRENT_VERSION, LinePayload, PayloadMove};
use drill_core::store::CardFields;
use drill_study::key::fen_of;
use drill_study::{LineMove, StudyLine};
use shakmaty::{Chess, Color, Position};
use tracing::trace;

use crate::diagram::Diagram;
use crate::error::RenderError;
use crate::html::escape;
use crate::notation::Notation;

/// Rendering settings shared by every card of a run.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub notation: Notation,
}

impl RenderContext {
    #[must_use]
    pub const fn new(notation: Notation) -> Self {
        Self { notation }
    }
}

/// A diagram to write next to its owning card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramArtifact {
    pub name: ArtifactName,
    pub diagram: Diagram,
}

/// One rendered answer move, with its own diagram when its comments carry
/// highlights.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AnswerDraft {
    text: String,
    diagram: Option<Diagram>,
}

fn join_answers(answers: &[AnswerDraft], image: impl Fn(&Diagram) -> String) -> String {
    answers
        .iter()
        .map(|a| match &a.diagram {
            Some(diagram) => {
                format!("{}<br><img src=\"{}\">", a.text, escape(&image(diagram)))
            }
            None => a.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

fn preview_image(diagram: &Diagram) -> String {
    format!("{}.svg", diagram.content_hash())
}

/// A rendered card whose record id is not known yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    /// Diff key: root FEN, move sequence, and answer set.
    pub signature: String,
    question_head: String,
    question_tail: String,
    /// Answer HTML as previewed: answer diagrams use the bare content hash
    /// as image name.
    pub answer: String,
    answers: Vec<AnswerDraft>,
    /// Line payload JSON stored in the `line` field.
    pub line: String,
    /// FEN of the decision position.
    pub fen: String,
    /// Board shown with the question.
    pub diagram: Diagram,
}

impl CardDraft {
    /// The question with `image` as diagram source.
    #[must_use]
    pub fn question_with(&self, image: &str) -> String {
        format!(
            "{}<br><img src=\"{}\">{}",
            self.question_head,
            escape(image),
            self.question_tail
        )
    }

    /// The question as shown before a record exists, with the bare content
    /// hash as image name.
    #[must_use]
    pub fn preview_question(&self) -> String {
        self.question_with(&preview_image(&self.diagram))
    }

    /// Diagrams drawn after highlighted answer moves.
    pub fn answer_diagrams(&self) -> impl Iterator<Item = &Diagram> {
        self.answers.iter().filter_map(|a| a.diagram.as_ref())
    }

    /// Number of distinct artifacts [`Self::artifacts_for`] returns.
    #[must_use]
    pub fn diagram_count(&self) -> usize {
        let mut hashes: Vec<String> = std::iter::once(&self.diagram)
            .chain(self.answer_diagrams())
            .map(Diagram::content_hash)
            .collect();
        hashes.sort_unstable();
        hashes.dedup();
        hashes.len()
    }

    /// Final fields and question diagram artifact for the record `id`.
    #[must_use]
    pub fn fields_for(&self, id: RecordId, namespace: &str) -> (CardFields, DiagramArtifact) {
        let name = ArtifactName::new(namespace, id, &self.diagram.content_hash());
        let fields = CardFields {
            question: self.question_with(name.as_str()),
            answer: join_answers(&self.answers, |diagram| {
                ArtifactName::new(namespace, id, &diagram.content_hash()).into_string()
            }),
            line: self.line.clone(),
            fen: self.fen.clone(),
        };
        (
            fields,
            DiagramArtifact {
                name,
                diagram: self.diagram.clone(),
            },
        )
    }

    /// Every diagram artifact the record `id` refers to, question first.
    #[must_use]
    pub fn artifacts_for(&self, id: RecordId, namespace: &str) -> Vec<DiagramArtifact> {
        let mut artifacts: Vec<DiagramArtifact> = Vec::new();
        for diagram in std::iter::once(&self.diagram).chain(self.answer_diagrams()) {
            let name = ArtifactName::new(namespace, id, &diagram.content_hash());
            if artifacts.iter().all(|a| a.name != name) {
                artifacts.push(DiagramArtifact {
                    name,
                    diagram: diagram.clone(),
                });
            }
        }
        artifacts
    }
}

/// Render one study line.
///
/// # Errors
///
/// Returns `RenderError::Payload` if the line payload cannot be serialized.
pub fn render_line(line: &StudyLine, ctx: &RenderContext) -> Result<CardDraft, RenderError> {
    let notation = &ctx.notation;

    let mut head = String::new();
    if !line.root_comments.is_empty() {
        let comments: Vec<String> = line.root_comments.iter().map(|c| escape(c)).collect();
        head.push_str("<div class=\"preamble\">");
        head.push_str(&comments.join("<br>"));
        head.push_str("</div>");
    }

    let mut position = line.root.clone();
    if line.moves.is_empty() {
        if line.root_fen == fen_of(&Chess::default()) {
            head.push_str("Moves from the starting position?");
        } else {
            head.push_str("Moves from this position?");
        }
    } else {
        let mut tokens = Vec::with_capacity(line.moves.len() + 1);
        if position.turn() == Color::Black {
            tokens.push(format!("{}...", position.fullmoves()));
        }
        for m in &line.moves {
            if position.turn() == Color::White {
                tokens.push(format!("{}.", position.fullmoves()));
            }
            tokens.push(notation.format(&position, &m.mv, &m.san, m.mark));
            position.play_unchecked(&m.mv);
        }
        head.push_str(&tokens.join(" "));

        if let Some(last) = line.moves.last() {
            for comment in &last.comments {
                head.push_str(" <em>");
                head.push_str(&escape(comment));
                head.push_str("</em>");
            }
        }
    }

    let tail = format!(
        "<br><span class=\"fen\">FEN: {}</span>",
        escape(&line.root_fen)
    );

    let prefix = if position.turn() == Color::White {
        format!("{}.", position.fullmoves())
    } else {
        format!("{}...", position.fullmoves())
    };
    let answers: Vec<AnswerDraft> = line
        .answers
        .iter()
        .map(|a| {
            let mut text = format!(
                "{prefix} {}",
                notation.format(&position, &a.mv, &a.san, a.mark)
            );
            if !a.comments.is_empty() {
                text.push_str(" <em>");
                text.push_str(&escape(&a.comments.join(" ")));
                text.push_str("</em>");
            }
            let diagram = (!a.highlights.is_empty()).then(|| {
                let mut after = position.clone();
                after.play_unchecked(&a.mv);
                Diagram::of_position(&after, line.side, Some(&a.mv), a.highlights.clone())
            });
            AnswerDraft { text, diagram }
        })
        .collect();

    let payload = LinePayload {
        v: CURRENT_VERSION,
        fen: line.root_fen.clone(),
        root_comments: line.root_comments.clone(),
        moves: line.moves.iter().map(payload_move).collect(),
        answers: line.answers.iter().map(payload_move).collect(),
    };

    let diagram = Diagram::of_position(
        &position,
        line.side,
        line.moves.last().map(|m| &m.mv),
        line.highlights.clone(),
    );

    let draft = CardDraft {
        signature: line.signature(),
        question_head: head,
        question_tail: tail,
        answer: join_answers(&answers, preview_image),
        answers,
        line: payload.to_json()?,
        fen: fen_of(&position),
        diagram,
    };
    trace!(signature = %draft.signature, "rendered card");
    Ok(draft)
}

fn payload_move(m: &LineMove) -> PayloadMove {
    PayloadMove {
        uci: m.uci(),
        san: Some(m.san.clone()),
        comments: m.comments.clone(),
        mark: m.mark,
    }
}
