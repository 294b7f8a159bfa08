use headmeta::cli::run;

fn main() -> anyhow::Result<()> {
    run()
}
