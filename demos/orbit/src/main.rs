use ripple_ngin::demos::orbit::Orbit;

fn main() -> anyhow::Result<()> {
    ripple_ngin::run(Box::new(Orbit::new()))
}
