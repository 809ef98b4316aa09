use anyhow::Result;
use uni_application::DirectoryUseCase;
use uni_core::FilterDimension;

pub fn toggle(usecase: &DirectoryUseCase, dimension: FilterDimension, value: &str) -> Result<()> {
    let selected = usecase.filters().toggle(dimension, value)?;
    println!(
        "{} '{}' in {}",
        if selected { "Selected" } else { "Deselected" },
        value,
        dimension
    );
    Ok(())
}

pub fn clear(usecase: &DirectoryUseCase) -> Result<()> {
    usecase.filters().clear_all()?;
    println!("Cleared all filters");
    Ok(())
}

pub fn favorites(usecase: &DirectoryUseCase, show: bool) -> Result<()> {
    usecase.filters().set_favorites_only(show)?;
    println!("Favorites only: {}", if show { "on" } else { "off" });
    Ok(())
}

pub fn show(usecase: &DirectoryUseCase) -> Result<()> {
    let selection = usecase.filters().selection();
    for dimension in FilterDimension::ALL {
        let values: Vec<&str> = selection
            .selected(dimension)
            .iter()
            .map(String::as_str)
            .collect();
        if values.is_empty() {
            println!("{:<11} {}", dimension, usecase.selected_label(dimension));
        } else {
            println!(
                "{:<11} {} ({})",
                dimension,
                usecase.selected_label(dimension),
                values.join(", ")
            );
        }
    }
    println!(
        "{:<11} {}",
        "favorites",
        if selection.show_favorites_only { "on" } else { "off" }
    );
    Ok(())
}
