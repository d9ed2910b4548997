//! The `drivecheck init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("drivecheck.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("catalogs")?;
    write_if_missing(Path::new("catalogs/highway.toml"), SAMPLE_CATALOG)?;

    std::fs::create_dir_all("scripts")?;
    write_if_missing(Path::new("scripts/practice-drive.toml"), SAMPLE_SCRIPT)?;

    println!("\nNext steps:");
    println!("  1. Run: drivecheck checklist --mode G");
    println!("  2. Run: drivecheck validate --catalog catalogs/highway.toml");
    println!("  3. Run: drivecheck run --script scripts/practice-drive.toml");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# drivecheck configuration

default_mode = "G2"
format = "text"

# Uncomment to use a custom catalog instead of the built-in one
# catalog = "catalogs/highway.toml"

# Uncomment to override the catalog's pass threshold
# pass_threshold_percent = 80
"#;

const SAMPLE_CATALOG: &str = r#"[catalog]
pass_threshold_percent = 80

[[categories]]
id = "highway"
title = "Highway Driving"
description = "Merging, lane discipline, and exits at speed."

[[categories.items]]
id = "on_ramp_merge"
title = "On-ramp merge"
detail = "Uses the full ramp to match traffic speed before merging."

[[categories.items]]
id = "exit_planning"
title = "Exit planning"
detail = "Moves into the exit lane early and signals before the ramp."

[[categories]]
id = "residential"
title = "Residential Streets"

[[categories.items]]
id = "school_zone_speed"
title = "School zone speed"
detail = "Slows for school zones and watches for children."

[[extras]]
category = "highway"

[[extras.items]]
id = "express_lane_changes"
title = "Express/collector transfers (G)"
detail = "Plans transfers between express and collector lanes."
modes = ["G"]
"#;

const SAMPLE_SCRIPT: &str = r#"mode = "G2"

[[actions]]
type = "grade"
item = "seatbelt_check"
answer = "yes"

[[actions]]
type = "grade"
item = "blind_spot_checks"
answer = "no"

[[actions]]
type = "grade"
item = "complete_stops"
answer = "no"

[[actions]]
type = "grade_remaining"
answer = "yes"

[[actions]]
type = "submit"
"#;
