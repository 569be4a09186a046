use ripple_ngin::demos::waves::Waves;

fn main() -> anyhow::Result<()> {
    ripple_ngin::run(Box::new(Waves::new()))
}
