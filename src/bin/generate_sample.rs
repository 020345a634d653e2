use rust_xlsxwriter::{Format, Workbook, XlsxError};

/// Deterministic splitmix64 stream, so every run writes the same workbook.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

const ROUTES: u32 = 25;
const DRIVERS: [&str; 4] = ["Alvarez", "Chen", "Okafor", "Novak"];

fn main() -> Result<(), XlsxError> {
    let mut rng = SampleRng(42);

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Progress")?;

    for (col, header) in ["route", "% Complete", "driver", "stops"].iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for i in 0..ROUTES {
        let row = i + 1;
        // Two decimal places, so the dashboard shows whole percentages.
        let completion = (rng.unit() * 100.0).round() / 100.0;
        let stops = 10 + (rng.next_u64() % 30);

        sheet.write_string(row, 0, format!("{}", 101 + i))?;
        sheet.write_number(row, 1, completion)?;
        sheet.write_string(row, 2, DRIVERS[i as usize % DRIVERS.len()])?;
        sheet.write_number(row, 3, stops as f64)?;
    }

    let output_path = "sample_progress.xlsx";
    workbook.save(output_path)?;

    println!("Wrote {ROUTES} routes to {output_path}");
    Ok(())
}
