use ripple_ngin::demos::earth::Earth;

fn main() -> anyhow::Result<()> {
    ripple_ngin::run(Box::new(Earth::new()))
}
