use std::env;
use std::fs;
use std::path::Path;

/// Columns the indicator reference table must carry to be usable.
const REQUIRED_COLUMNS: [&str; 3] = ["Indicateur", "Thématique", "Nouveau_nom_indicateur"];

/// True when `path` is a `;`-delimited table with the required header.
fn is_reference_table(path: &Path) -> bool {
    let Ok(mut rdr) = csv::ReaderBuilder::new().delimiter(b';').from_path(path) else {
        return false;
    };
    let Ok(headers) = rdr.headers() else {
        return false;
    };
    let names: Vec<&str> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();
    REQUIRED_COLUMNS.iter().all(|c| names.contains(c))
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest = Path::new(&out_dir).join("columns_indicateurs.csv");

    // Embed the indicator reference table. Without it every indicator is
    // shown under its raw code in the "Non classé" theme.
    let mapping_src = Path::new("../fixtures/columns_indicateurs.csv");
    if mapping_src.exists() && is_reference_table(mapping_src) {
        fs::copy(mapping_src, &dest).unwrap();
    } else {
        println!(
            "cargo:warning=fixtures/columns_indicateurs.csv missing or invalid, indicators will be unclassified"
        );
        fs::write(&dest, "").unwrap();
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../fixtures/columns_indicateurs.csv");
}
