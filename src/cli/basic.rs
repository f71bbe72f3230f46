//! One-shot commands over a JSON Lines file.

use std::path::Path;

use crate::{
    config::SessionConfig,
    dataset::DatasetStore,
    mode::AnnotationMode,
    tui::{render_raw, OverviewTable, RecordView},
};

/// Load a file into a fresh store for `mode`.
pub(crate) fn load_store(path: &Path, mode: AnnotationMode) -> crate::Result<DatasetStore> {
    let mut store = DatasetStore::new(mode);
    store.load_file(path)?;
    Ok(store)
}

/// Print one record, clamping `index` into range.
pub(crate) fn cmd_show(path: &Path, mode: AnnotationMode, index: i64, raw: bool) -> crate::Result<()> {
    let mut store = load_store(path, mode)?;
    store.seek(index);

    let config = SessionConfig::default().with_mode(mode);
    let lines = if raw {
        render_raw(store.current()?, config.display_width)
    } else {
        RecordView::from_store(&store, &config.projector(), config.display_width)?.render_lines()
    };

    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// Load, inject the mode's default fields and write both output files.
pub(crate) fn cmd_export(path: &Path, mode: AnnotationMode, output_dir: &Path) -> crate::Result<()> {
    let store = load_store(path, mode)?;
    let bundle = store.export_bundle()?;
    let paths = bundle.write_to_dir(output_dir)?;

    println!(
        "Exported {} records -> {}, {}",
        bundle.record_count,
        paths.jsonl.display(),
        paths.csv.display()
    );
    Ok(())
}

/// Print annotation progress.
pub(crate) fn cmd_stats(path: &Path, mode: AnnotationMode, table: bool) -> crate::Result<()> {
    let store = load_store(path, mode)?;
    let progress = store.progress();

    println!("File: {}", path.display());
    println!("Mode: {mode}");
    println!("Records: {}", progress.total);
    println!("Columns: {}", store.columns().len());
    println!(
        "Annotated: {} ({:.1}%)",
        progress.annotated,
        progress.ratio() * 100.0
    );
    println!("Remaining: {}", progress.remaining());

    if table {
        let config = SessionConfig::default();
        let overview = OverviewTable::new(&store, config.overview_rows, config.display_width);
        println!();
        for line in overview.render_lines() {
            println!("{line}");
        }
    }
    Ok(())
}
