//! Regenerates the bundled sample datasets under `assets/`.
//!
//! Both CSVs are simulated: plausible distributions, deterministic seed.

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn choice<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn write_cybersecurity(rng: &mut SimpleRng, path: &str) -> Result<usize> {
    let countries = [
        "USA", "UK", "Germany", "France", "India", "China", "Brazil", "Japan", "Australia",
        "Russia",
    ];
    let attack_types = [
        "Phishing",
        "Ransomware",
        "DDoS",
        "Malware",
        "SQL Injection",
        "Man-in-the-Middle",
    ];
    let vulnerabilities = [
        "Weak Passwords",
        "Unpatched Software",
        "Social Engineering",
        "Zero-day",
    ];
    let defenses = [
        "Firewall",
        "Antivirus",
        "VPN",
        "AI-based Detection",
        "Encryption",
    ];

    let mut writer = csv::Writer::from_path(path).context("creating cybersecurity CSV")?;
    writer.write_record([
        "Year",
        "Country",
        "Attack Type",
        "Financial Loss (in Million $)",
        "Number of Affected Users",
        "Incident Resolution Time (in Hours)",
        "Security Vulnerability Type",
        "Defense Mechanism Used",
    ])?;

    let rows = 200;
    for _ in 0..rows {
        let year = rng.range(2015, 2024);
        // Exposure grows over the decade.
        let growth = 1.0 + 0.08 * (year - 2015) as f64;
        let loss = rng.gauss(50.0, 25.0).abs() * growth;
        let users = (rng.gauss(500_000.0, 250_000.0).abs() * growth) as i64;
        let defense = *rng.choice(&defenses);
        // Automated defenses resolve faster.
        let base_hours = if defense == "AI-based Detection" { 24.0 } else { 40.0 };
        let hours = rng.gauss(base_hours, 12.0).abs();

        writer.write_record([
            year.to_string(),
            (*rng.choice(&countries)).to_string(),
            (*rng.choice(&attack_types)).to_string(),
            format!("{loss:.2}"),
            users.to_string(),
            format!("{hours:.1}"),
            (*rng.choice(&vulnerabilities)).to_string(),
            defense.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(rows)
}

fn write_students(rng: &mut SimpleRng, path: &str) -> Result<usize> {
    let genders = ["Female", "Male", "Other"];
    let yes_no = ["No", "Yes"];
    let internet = ["Poor", "Average", "Good"];
    let education = ["High School", "Bachelor", "Master"];
    let diets = ["Poor", "Fair", "Good"];

    let mut writer = csv::Writer::from_path(path).context("creating student CSV")?;
    writer.write_record([
        "gender",
        "part_time_job",
        "age",
        "internet_quality",
        "mental_health_rating",
        "parental_education_level",
        "exam_score",
        "study_hours_per_day",
        "sleep_hours",
        "diet_quality",
    ])?;

    let rows = 150;
    for _ in 0..rows {
        let study_hours = rng.uniform(0.5, 8.0);
        let sleep_hours = rng.uniform(4.0, 9.5);
        let mental_health = rng.range(1, 10);
        // Score tracks study time and mental health, with noise.
        let score = (40.0 + 5.5 * study_hours + 1.5 * mental_health as f64
            + rng.gauss(0.0, 8.0))
        .clamp(0.0, 100.0);

        writer.write_record([
            (*rng.choice(&genders)).to_string(),
            (*rng.choice(&yes_no)).to_string(),
            rng.range(17, 24).to_string(),
            (*rng.choice(&internet)).to_string(),
            mental_health.to_string(),
            (*rng.choice(&education)).to_string(),
            format!("{score:.1}"),
            format!("{study_hours:.1}"),
            format!("{sleep_hours:.1}"),
            (*rng.choice(&diets)).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let n = write_cybersecurity(&mut rng, "assets/global_cybersecurity_threats.csv")?;
    println!("Wrote {n} incidents to assets/global_cybersecurity_threats.csv");

    let n = write_students(&mut rng, "assets/student_habits_performance.csv")?;
    println!("Wrote {n} students to assets/student_habits_performance.csv");

    Ok(())
}
