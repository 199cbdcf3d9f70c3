//! Printed summary of an `AnalysisReport`: species in energy order with their connectivity and
//! community, the communities themselves, degree histograms and the warnings collected on the
//! way. Species listed in `display_excluded` (the electron by default) are left out of the
//! tables only.
use crate::ReactionNetwork::connectivity_energy::{
    ConnectivityEnergySeries, Histogram, degree_histogram,
};
use crate::ReactionNetwork::pipeline::AnalysisReport;
use prettytable::{Table, row};

impl AnalysisReport {
    /// chart data for reactant connectivity against energy
    pub fn reactant_series(&self) -> ConnectivityEnergySeries {
        ConnectivityEnergySeries::build(
            &self.energies,
            &self.binary_degrees_sorted.reactants,
            &self.ordering.ordered_species,
        )
    }

    /// chart data for product connectivity against energy
    pub fn product_series(&self) -> ConnectivityEnergySeries {
        ConnectivityEnergySeries::build(
            &self.energies,
            &self.binary_degrees_sorted.products,
            &self.ordering.ordered_species,
        )
    }

    /// histograms of reactant and product degrees (binary)
    pub fn degree_histograms(&self, bins: usize, range: (f64, f64)) -> (Histogram, Histogram) {
        let reactants: Vec<f64> = self.binary_degrees.reactants.iter().copied().collect();
        let products: Vec<f64> = self.binary_degrees.products.iter().copied().collect();
        (
            degree_histogram(&reactants, bins, range),
            degree_histogram(&products, bins, range),
        )
    }

    /// counts of the run; matrices are reactions x species
    pub fn summary_table(&self) -> Table {
        let (reactions, species) = self.binary.shape();
        let mut summary = Table::new();
        summary.add_row(row!["Species", species]);
        summary.add_row(row!["Reactions", reactions]);
        summary.add_row(row!["Ordered species", self.ordering.ordered_species.len()]);
        summary.add_row(row!["Bipartite edges", self.bipartite.edge_count()]);
        summary.add_row(row!["Projected edges", self.projected.edge_count()]);
        summary.add_row(row!["Communities", self.communities.partition.num_communities()]);
        summary.add_row(row!["Modularity", format!("{:.4}", self.modularity)]);
        summary
    }

    pub fn connectivity_table(&self, excluded: &[String]) -> Table {
        let mut table = Table::new();
        table.add_row(row![
            "Species",
            "Energy",
            "Reactant deg.",
            "Product deg.",
            "Reactant deg. (w)",
            "Product deg. (w)",
            "Community"
        ]);
        for (i, species) in self.ordering.ordered_species.iter().enumerate() {
            if excluded.contains(species) {
                continue;
            }
            let community = self
                .communities
                .partition
                .community_of(species)
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string());
            table.add_row(row![
                species,
                format!("{:.4}", self.ordering.energies[i]),
                self.binary_degrees_sorted.reactants[i],
                self.binary_degrees_sorted.products[i],
                self.weighted_degrees_sorted.reactants[i],
                self.weighted_degrees_sorted.products[i],
                community
            ]);
        }
        table
    }

    pub fn community_table(&self, excluded: &[String]) -> Table {
        let mut table = Table::new();
        table.add_row(row!["Community", "Size", "Species"]);
        for (label, members) in self.communities.partition.communities().iter().enumerate() {
            let shown: Vec<&str> = members
                .iter()
                .filter(|s| !excluded.contains(*s))
                .map(|s| s.as_str())
                .collect();
            table.add_row(row![label, members.len(), shown.join(", ")]);
        }
        table
    }

    pub fn warnings_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["#", "Warning"]);
        for (i, w) in self.warnings.iter().enumerate() {
            table.add_row(row![i + 1, w.to_string()]);
        }
        table
    }

    pub fn pretty_print(&self, excluded: &[String], bins: usize, range: (f64, f64)) {
        println!("\n=== REACTION NETWORK ===");
        self.summary_table().printstd();

        println!("\n=== CONNECTIVITY BY ENERGY ===");
        self.connectivity_table(excluded).printstd();
        for (title, series) in [
            ("reactants", self.reactant_series()),
            ("products", self.product_series()),
        ] {
            if let Some(peak) = series.peak() {
                println!(
                    "most connected {}: {} ({} reactions at {:.4})",
                    title, peak.species, peak.connectivity, peak.energy
                );
            }
            let labels: Vec<String> = series
                .highlighted_labels()
                .into_iter()
                .filter(|s| !excluded.contains(s))
                .collect();
            println!("labelled {}: {}", title, labels.join(", "));
        }

        println!("\n=== DEGREE HISTOGRAMS ===");
        let (reactants, products) = self.degree_histograms(bins, range);
        let mut hist = Table::new();
        hist.add_row(row!["From", "To", "Reactants", "Products"]);
        for i in 0..reactants.counts.len() {
            if reactants.counts[i] == 0 && products.counts[i] == 0 {
                continue;
            }
            hist.add_row(row![
                format!("{:.1}", reactants.edges[i]),
                format!("{:.1}", reactants.edges[i + 1]),
                reactants.counts[i],
                products.counts[i]
            ]);
        }
        hist.printstd();

        println!("\n=== COMMUNITIES ===");
        self.community_table(excluded).printstd();

        if !self.warnings.is_empty() {
            println!("\n=== WARNINGS ===");
            self.warnings_table().printstd();
        }
    }
}
