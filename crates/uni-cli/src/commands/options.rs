use anyhow::Result;
use uni_application::DirectoryUseCase;
use uni_core::FilterDimension;

pub async fn run(usecase: &DirectoryUseCase, dimension: FilterDimension) -> Result<()> {
    usecase.start(None).await?;

    let options = usecase.filter_options();
    let selection = usecase.filters().selection();
    for option in options.get(dimension) {
        let marker = if selection.selected(dimension).contains(&option.value) {
            "[x]"
        } else {
            "[ ]"
        };
        println!("{} {}", marker, option.label);
    }
    Ok(())
}
