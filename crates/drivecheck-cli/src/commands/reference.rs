//! The `drivecheck reference` command.

use anyhow::Result;

use drivecheck_core::model::TestMode;
use drivecheck_core::reference::quick_reference;

pub fn execute(mode: String) -> Result<()> {
    let mode: TestMode = mode.parse()?;
    let reference = quick_reference(mode);

    println!("{}", reference.title);
    for bullet in reference.bullets {
        println!("  - {bullet}");
    }
    println!("\n{}", reference.note);

    Ok(())
}
