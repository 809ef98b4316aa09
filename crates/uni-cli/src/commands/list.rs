use anyhow::Result;
use uni_application::DirectoryUseCase;
use uni_core::{CompanyRecord, Identity};

pub async fn run(usecase: &DirectoryUseCase, identity: Option<Identity>) -> Result<()> {
    usecase.start(identity).await?;

    let visible = usecase.visible();
    if visible.is_empty() {
        println!("No companies match the current filters.");
        return Ok(());
    }

    let saved = usecase.saved().snapshot();
    for record in &visible {
        println!("{}", format_row(record, saved.contains(&record.company_name)));
    }
    eprintln!("{} companies", visible.len());
    Ok(())
}

fn format_row(record: &CompanyRecord, saved: bool) -> String {
    format!(
        "{} {}\t{}\t{}\t${}B",
        if saved { "*" } else { " " },
        record.company_name,
        record.city,
        record.industry,
        record.valuation_billions
    )
}
