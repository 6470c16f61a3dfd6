fn main() -> anyhow::Result<()> {
    onboard_app::run()
}
