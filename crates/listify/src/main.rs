use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    listify::ui::app::run()
}
