use anyhow::Result;
use uni_application::{DirectoryUseCase, SyncPhase, SyncSnapshot};
use uni_core::Identity;

/// What a printed line shows; `refreshing` flips are not worth a line.
#[derive(Debug, Clone, PartialEq)]
struct Visible {
    phase: SyncPhase,
    saved: Vec<String>,
    error: Option<String>,
}

impl From<&SyncSnapshot> for Visible {
    fn from(snapshot: &SyncSnapshot) -> Self {
        Self {
            phase: snapshot.phase,
            saved: snapshot.saved.clone(),
            error: snapshot.error.clone(),
        }
    }
}

pub async fn run(usecase: &DirectoryUseCase, identity: Option<Identity>) -> Result<()> {
    if identity.is_none() {
        tracing::warn!("[Watch] No identity configured; saved items will stay empty");
    }

    let mut snapshots = usecase.saved().subscribe();
    if let Err(e) = usecase.start(identity).await {
        tracing::warn!("[Watch] Catalog unavailable: {}", e);
    }
    let mut last = Visible::from(&*snapshots.borrow_and_update());
    println!("{}", format_line(&last));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = Visible::from(&*snapshots.borrow_and_update());
                if let Some(line) = next_line(&mut last, current) {
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}

/// Returns the line to print for `current`, or `None` if it shows nothing new.
fn next_line(last: &mut Visible, current: Visible) -> Option<String> {
    if *last == current {
        return None;
    }
    *last = current;
    Some(format_line(last))
}

fn format_line(state: &Visible) -> String {
    match &state.error {
        Some(error) => format!("{:?}: {} ({})", state.phase, state.saved.join(", "), error),
        None => format!("{:?}: {}", state.phase, state.saved.join(", ")),
    }
}
