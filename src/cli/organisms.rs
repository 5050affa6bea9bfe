use crate::model::organism::Organism;

pub fn handle() -> anyhow::Result<()> {
    println!("organism\tservice");
    for organism in Organism::ordered() {
        println!("{}\t{}", organism, organism.service_url());
    }
    Ok(())
}
