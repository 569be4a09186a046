use ripple_ngin::demos::flag::Flag;

fn main() -> anyhow::Result<()> {
    ripple_ngin::run(Box::new(Flag::new()))
}
