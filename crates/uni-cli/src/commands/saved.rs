use anyhow::{Result, anyhow, bail};
use uni_application::{DirectoryUseCase, SyncOutcome, SyncPhase};
use uni_core::Identity;

/// Signs `identity` in, failing when none is configured or the initial fetch fails.
async fn sign_in(usecase: &DirectoryUseCase, identity: Option<Identity>) -> Result<()> {
    let Some(identity) = identity else {
        bail!("Not signed in: set user_email in config.toml or UNI_USER_EMAIL");
    };

    if let SyncOutcome::Failed(error) = usecase.saved().sign_in(identity).await {
        let message = usecase.saved().snapshot().error.unwrap_or_default();
        return Err(anyhow!(error).context(message));
    }
    Ok(())
}

pub async fn list(usecase: &DirectoryUseCase, identity: Option<Identity>) -> Result<()> {
    sign_in(usecase, identity).await?;

    let snapshot = usecase.saved().snapshot();
    if snapshot.saved.is_empty() {
        println!("No saved companies.");
    }
    for name in &snapshot.saved {
        println!("{}", name);
    }
    Ok(())
}

pub async fn add(usecase: &DirectoryUseCase, identity: Option<Identity>, name: &str) -> Result<()> {
    sign_in(usecase, identity).await?;
    report(usecase, usecase.saved().add(name).await, "Saved", name)
}

pub async fn remove(
    usecase: &DirectoryUseCase,
    identity: Option<Identity>,
    name: &str,
) -> Result<()> {
    sign_in(usecase, identity).await?;
    report(usecase, usecase.saved().remove(name).await, "Removed", name)
}

fn report(usecase: &DirectoryUseCase, outcome: SyncOutcome, verb: &str, name: &str) -> Result<()> {
    match outcome {
        SyncOutcome::Applied(saved) => {
            println!("{} '{}' ({} saved)", verb, name, saved.len());
            Ok(())
        }
        SyncOutcome::Failed(error) => {
            let snapshot = usecase.saved().snapshot();
            let message = match snapshot.phase {
                SyncPhase::Error => snapshot.error.unwrap_or_default(),
                _ => String::new(),
            };
            Err(anyhow!(error).context(message))
        }
        SyncOutcome::Skipped => bail!("Not signed in"),
        SyncOutcome::Discarded => bail!("Session ended before the server answered"),
    }
}
