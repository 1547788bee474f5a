fn main() -> anyhow::Result<()> {
    axiom_loader::run()
}
