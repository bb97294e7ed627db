// Copyright (C) 2020-2026 Andy Kurnia.

use super::{dictionary, display, error::SearchError, game_config, movegen, play_scorer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct Placement {
    pub letter: char,
    pub is_blank: bool,
    pub row: i8,
    pub col: i8,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct Move {
    pub placements: Vec<Placement>,
    // main word first
    pub words: Vec<String>,
    pub score: i16,
    pub down: bool,
}

impl Move {
    pub fn from_play(board_snapshot: &movegen::BoardSnapshot<'_>, play: &movegen::Play) -> Self {
        let movegen::Play::Place {
            down,
            lane,
            idx,
            word,
            score,
        } = play;
        let alphabet = board_snapshot.game_config.alphabet();
        let dim = board_snapshot.game_config.board_layout().dim();
        let placements = (*idx..)
            .zip(word.iter())
            .filter(|&(_, &tile)| tile != 0)
            .filter_map(|(i, &tile)| {
                let (row, col) = dim.row_col(*down, *lane, i);
                Some(Placement {
                    letter: alphabet.letter(tile)?,
                    is_blank: tile & 0x80 != 0,
                    row,
                    col,
                })
            })
            .collect();
        Self {
            placements,
            words: play_scorer::words_formed(board_snapshot, play),
            score: *score,
            down: *down,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(first) = self.placements.first() else {
            return write!(f, "(none)");
        };
        // blanks in lowercase, like on the board
        let placed = self
            .placements
            .iter()
            .map(|p| {
                if p.is_blank {
                    p.letter.to_lowercase().next().unwrap_or(p.letter)
                } else {
                    p.letter
                }
            })
            .collect::<String>();
        write!(
            f,
            "{} {} ({}) {}",
            display::fmt_coord(self.down, first.row, first.col),
            self.words.first().map_or("", |w| w.as_str()),
            placed,
            self.score
        )
    }
}

// Owned inputs for a search that outlives the caller's borrows.
pub struct SearchRequest {
    pub dictionary: Arc<dictionary::Dictionary>,
    pub game_config: Arc<game_config::GameConfig>,
    pub board_tiles: Box<[u8]>,
    pub rack: Box<[u8]>,
    pub deadline: Option<std::time::Instant>,
}

impl SearchRequest {
    // snapshot, so later board changes do not affect the search.
    pub fn new(
        dictionary: Arc<dictionary::Dictionary>,
        game_config: Arc<game_config::GameConfig>,
        board_tiles: &[u8],
        rack: &[u8],
    ) -> Self {
        Self {
            dictionary,
            game_config,
            board_tiles: board_tiles.into(),
            rack: rack.into(),
            deadline: None,
        }
    }

    fn run<F: FnMut(Move)>(
        &self,
        cancel: Arc<AtomicBool>,
        mut on_move: F,
    ) -> Result<movegen::SearchOutcome, SearchError> {
        let board_snapshot = movegen::BoardSnapshot {
            board_tiles: &self.board_tiles,
            game_config: &self.game_config,
            dictionary: &self.dictionary,
        };
        let limits = movegen::SearchLimits {
            deadline: self.deadline,
            cancel: Some(cancel),
        };
        movegen::find_best_play(&board_snapshot, &self.rack, &limits, |play| {
            on_move(Move::from_play(&board_snapshot, play))
        })
    }
}

// Raises the flag when dropped, so an abandoned search stops at its next anchor.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

pub struct SearchHandle {
    receiver: std::sync::mpsc::Receiver<Move>,
    cancel: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<Result<movegen::SearchOutcome, SearchError>>>,
}

impl SearchHandle {
    // improving candidates, ends when the search does.
    pub fn candidates(&self) -> std::sync::mpsc::Iter<'_, Move> {
        self.receiver.iter()
    }

    pub fn try_candidate(&self) -> Option<Move> {
        self.receiver.try_recv().ok()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn join(mut self) -> Result<movegen::SearchOutcome, SearchError> {
        let Some(join_handle) = self.join_handle.take() else {
            return Err(SearchError::WorkerFailed("search already joined".into()));
        };
        join_handle
            .join()
            .map_err(|_| SearchError::WorkerFailed("search thread panicked".into()))?
    }
}

// Dropping the handle without joining abandons the search.
impl Drop for SearchHandle {
    fn drop(&mut self) {
        if self.join_handle.is_some() {
            self.cancel();
        }
    }
}

pub fn spawn_search(request: SearchRequest) -> SearchHandle {
    let (sender, receiver) = std::sync::mpsc::channel();
    let cancel = Arc::new(AtomicBool::new(false));
    let worker_cancel = Arc::clone(&cancel);
    let join_handle = std::thread::spawn(move || {
        request.run(worker_cancel, |m| {
            // nobody listening is fine
            let _ = sender.send(m);
        })
    });
    SearchHandle {
        receiver,
        cancel,
        join_handle: Some(join_handle),
    }
}

// Resolves to the best move found within the time budget. on_candidate sees
// every improving move as it arrives.
pub async fn find_best_play<F: FnMut(&Move)>(
    request: SearchRequest,
    time_budget: Option<std::time::Duration>,
    on_candidate: F,
) -> Result<Option<Move>, SearchError> {
    search_until_dropped(
        request,
        time_budget,
        Arc::new(AtomicBool::new(false)),
        on_candidate,
    )
    .await
}

// cancel is raised when the budget elapses or when this future is dropped.
async fn search_until_dropped<F: FnMut(&Move)>(
    mut request: SearchRequest,
    time_budget: Option<std::time::Duration>,
    cancel: Arc<AtomicBool>,
    mut on_candidate: F,
) -> Result<Option<Move>, SearchError> {
    let deadline = time_budget.map(|budget| std::time::Instant::now() + budget);
    request.deadline = deadline;
    let worker_cancel = Arc::clone(&cancel);
    let cancel = CancelOnDrop(cancel);
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let task = tokio::task::spawn_blocking(move || {
        request.run(worker_cancel, |m| {
            let _ = sender.send(m);
        })
    });

    let backstop = async {
        match deadline {
            Some(deadline) => {
                tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
            }
            None => std::future::pending().await,
        }
    };
    tokio::pin!(backstop);
    let mut best = None;
    let mut timed_out = false;
    loop {
        tokio::select! {
            candidate = receiver.recv() => match candidate {
                Some(m) => {
                    on_candidate(&m);
                    best = Some(m);
                }
                None => break,
            },
            _ = &mut backstop, if !timed_out => {
                timed_out = true;
                cancel.0.store(true, Ordering::Relaxed);
                tracing::debug!("time budget elapsed, cancelling search");
            }
        }
    }

    let outcome = task
        .await
        .map_err(|e| SearchError::WorkerFailed(e.to_string()))??;
    tracing::info!(
        candidates = outcome.num_candidates,
        anchors = outcome.num_anchors,
        cancelled = outcome.cancelled,
        best = ?best.as_ref().map(|m: &Move| m.to_string()),
        "search done"
    );
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;

    fn make_request(words: &[&str], rack: &str) -> SearchRequest {
        let (bytes, _) = build::build(build::BuildFormat::Raw, words).unwrap();
        let dictionary = Arc::new(dictionary::Dictionary::from_bytes(&bytes).unwrap());
        let game_config = Arc::new(game_config::make_english_game_config());
        let rack = game_config.alphabet().parse_rack(rack).unwrap();
        let board_tiles = vec![0u8; game_config.board_layout().dim().area()];
        SearchRequest::new(dictionary, game_config, &board_tiles, &rack)
    }

    #[test]
    fn threaded_search() {
        let handle = spawn_search(make_request(&["QI", "QIS", "SI"], "QIS"));
        let candidates = handle.candidates().collect::<Vec<_>>();
        let outcome = handle.join().unwrap();
        assert_eq!(candidates.len(), outcome.num_candidates);
        let best = candidates.last().unwrap();
        assert_eq!(best.words, vec!["QIS"]);
        assert_eq!(best.placements.len(), 3);
        assert_eq!(best.score, outcome.best.unwrap().score());
    }

    #[tokio::test]
    async fn async_search() {
        let mut seen = 0;
        let best = find_best_play(
            make_request(&["DOULEIA"], "AEIOU??"),
            Some(std::time::Duration::from_secs(30)),
            |_| seen += 1,
        )
        .await
        .unwrap()
        .unwrap();
        assert!(seen >= 1);
        assert_eq!(best.words, vec!["DOULEIA"]);
        assert!(best.placements[0].is_blank);
        assert_eq!(best.placements[0].letter, 'D');
        assert!(best.placements.iter().any(|p| (p.row, p.col) == (7, 7)));
    }

    #[test]
    fn dropped_handle_cancels() {
        let handle = spawn_search(make_request(&["QI", "QIS", "SI"], "QIS"));
        let cancel = Arc::clone(&handle.cancel);
        drop(handle);
        assert!(cancel.load(Ordering::Relaxed));

        let handle = spawn_search(make_request(&["QI", "QIS", "SI"], "QIS"));
        let cancel = Arc::clone(&handle.cancel);
        handle.join().unwrap();
        assert!(!cancel.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn dropped_future_cancels() {
        // a lexicon big enough that the search is still running when polled once.
        let mut words = vec![];
        for a in 'A'..='F' {
            for b in 'A'..='F' {
                for c in 'A'..='F' {
                    words.push(format!("{}{}", a, b));
                    words.push(format!("{}{}{}", a, b, c));
                    words.push(format!("{}{}{}{}", a, b, c, a));
                }
            }
        }
        words.sort();
        words.dedup();
        let words = words.iter().map(|w| w.as_str()).collect::<Vec<_>>();
        let cancel = Arc::new(AtomicBool::new(false));
        let elapsed = tokio::time::timeout(
            std::time::Duration::ZERO,
            search_until_dropped(
                make_request(&words, "ABCDEF?"),
                None,
                Arc::clone(&cancel),
                |_| {},
            ),
        )
        .await;
        assert!(elapsed.is_err());
        assert!(cancel.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn no_candidates_is_not_an_error() {
        let best = find_best_play(make_request(&["ZZZ"], "AB"), None, |_| {})
            .await
            .unwrap();
        assert!(best.is_none());
    }

    #[tokio::test]
    async fn invalid_rack_is_an_error() {
        let mut request = make_request(&["AB"], "AB");
        request.rack = vec![99u8].into();
        assert!(matches!(
            find_best_play(request, None, |_| {}).await,
            Err(SearchError::InvalidRack(_))
        ));
    }
}
