//! Integration tests: the full driver stack against the pin-level emulator.

use pinflash_core::{Addressing, ChipProfile, Error, Flash, PinAssignment, Status};
use pinflash_dummy::{DummyConfig, DummyFlash};

const PINS: PinAssignment = PinAssignment {
    cs: 4,
    sck: 5,
    mosi: 11,
    miso: 12,
    wp: 13,
    hold: 14,
};

fn flash_with(config: DummyConfig, profile: ChipProfile) -> Flash<DummyFlash> {
    let mut flash = Flash::new(DummyFlash::new(config, PINS), PINS, profile);
    flash.init();
    flash
}

fn flash() -> Flash<DummyFlash> {
    flash_with(DummyConfig::default(), ChipProfile::mx25l1606e())
}

#[test]
fn jedec_id_round_trip() {
    let mut flash = flash();
    assert_eq!(flash.read_jedec_id(), 0xC22015);
}

#[test]
fn electronic_id_after_dummy_cycles() {
    let mut flash = flash();
    assert_eq!(flash.read_electronic_id(), 0x14);
}

#[test]
fn status_reflects_write_enable_latch() {
    let mut flash = flash();
    assert!(!flash.is_busy());
    flash.write_enable();
    assert!(flash.read_status().contains(Status::WEL));
    assert!(flash.bus().is_write_enabled());
    flash.write_disable();
    assert!(!flash.read_status().contains(Status::WEL));
}

#[test]
fn read_returns_prefilled_data() {
    let chip = DummyFlash::with_data(
        DummyConfig::default(),
        PINS,
        &[1, 2, 3, 4, 5, 6, 7, 8],
    );
    let mut flash = Flash::new(chip, PINS, ChipProfile::mx25l1606e());
    flash.init();
    let mut buf = [0u8; 8];
    flash.read(0, &mut buf).unwrap();
    assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn write_read_round_trip() {
    let mut flash = flash();
    let data: Vec<u8> = (0..300).map(|i| (i % 251) as u8).collect();
    flash.write(40, &data).unwrap();

    let mut back = vec![0u8; data.len()];
    flash.read(40, &mut back).unwrap();
    assert_eq!(back, data);
}

#[test]
fn write_crossing_page_boundary_lands_in_both_pages() {
    let mut flash = flash();
    flash.write(250, &[0xAA; 20]).unwrap();
    assert_eq!(&flash.bus().data()[250..270], &[0xAA; 20]);
    // Neighbours untouched
    assert_eq!(flash.bus().data()[249], 0xFF);
    assert_eq!(flash.bus().data()[270], 0xFF);
}

#[test]
fn raw_page_program_wraps_within_page() {
    let mut flash = flash();
    let mut payload = vec![0xF0u8; 260];
    for byte in &mut payload[256..] {
        *byte = 0x0F;
    }
    // Bypassing the splitter: the 4 bytes past the boundary wrap onto the
    // page start and AND with what was just programmed there
    flash.page_program(0, &payload).unwrap();
    assert_eq!(&flash.bus().data()[0..4], &[0x00, 0x00, 0x00, 0x00]);
    assert_eq!(flash.bus().data()[4], 0xF0);
    assert_eq!(flash.bus().data()[255], 0xF0);
    assert_eq!(flash.bus().data()[256], 0xFF);
}

#[test]
fn programming_only_clears_bits() {
    let mut flash = flash();
    flash.write(0, &[0x0F]).unwrap();
    flash.write(0, &[0xF0]).unwrap();
    assert_eq!(flash.bus().data()[0], 0x00);
}

#[test]
fn sector_erase_resets_whole_sector() {
    let mut flash = flash();
    flash.write(4096, &[0u8; 64]).unwrap();
    flash.sector_erase(4100).unwrap();
    assert!(flash.bus().data()[4096..8192].iter().all(|&b| b == 0xFF));
}

#[test]
fn chip_erase_resets_everything() {
    let mut flash = flash();
    flash.write(0, &[0u8; 16]).unwrap();
    flash.write(0x1F_0000, &[0u8; 16]).unwrap();
    flash.chip_erase().unwrap();
    assert!(flash.bus().data().iter().all(|&b| b == 0xFF));
}

#[test]
fn invalid_address_rejected_without_bus_activity() {
    let mut flash = flash();
    let size = flash.profile().total_size;

    assert_eq!(flash.sector_erase(size + 1), Err(Error::AddressInvalid));
    assert_eq!(flash.page_program(size + 1, &[0]), Err(Error::AddressInvalid));
    let mut buf = [0u8; 4];
    assert_eq!(flash.read(size + 1, &mut buf), Err(Error::AddressInvalid));

    assert_eq!(flash.bus().transactions(), 0);
    assert_eq!(flash.bus().clock_edges(), 0);
}

#[test]
fn busy_chip_rejects_mutations() {
    let mut flash = flash();
    flash.bus_mut().set_busy_reads(10);
    assert_eq!(flash.sector_erase(0), Err(Error::Busy));
    flash.bus_mut().set_busy_reads(10);
    assert_eq!(flash.page_program(0, &[0]), Err(Error::Busy));
}

#[test]
fn wait_ready_boundary() {
    let mut flash = flash();

    // Busy clears after 5 status reads: a budget of 5 suffices
    flash.bus_mut().set_busy_reads(5);
    assert!(flash.wait_ready(5));

    // A budget of 4 does not
    flash.bus_mut().set_busy_reads(5);
    assert!(!flash.wait_ready(4));
}

#[test]
fn wait_ready_on_idle_chip_costs_one_read() {
    let mut flash = flash();
    assert!(flash.wait_ready(0));
}

#[test]
fn four_byte_mode_detected_from_security_register() {
    let config = DummyConfig {
        four_byte_addr: true,
        size: 4 * 1024 * 1024,
        ..DummyConfig::default()
    };
    let mut profile = ChipProfile::mx25l1606e();
    profile.total_size = 4 * 1024 * 1024;

    let mut flash = flash_with(config, profile);
    flash.write(0x12345, b"wide").unwrap();
    let mut back = [0u8; 4];
    flash.read(0x12345, &mut back).unwrap();
    assert_eq!(&back, b"wide");
}

#[test]
fn static_addressing_skips_mode_query() {
    let mut profile = ChipProfile::mx25l1606e();
    profile.addressing = Addressing::ThreeByte;
    let mut flash = flash_with(DummyConfig::default(), profile);

    let mut buf = [0u8; 1];
    flash.read(0, &mut buf).unwrap();
    assert_eq!(flash.bus().transactions(), 1);
}

#[test]
fn detect_addressing_queries_security_register() {
    let mut flash = flash();
    let mut buf = [0u8; 1];
    flash.read(0, &mut buf).unwrap();
    // RDSCUR frame plus the READ frame itself
    assert_eq!(flash.bus().transactions(), 2);
}

#[test]
fn power_down_blocks_commands_until_released() {
    let mut flash = flash();
    flash.power_down();
    assert!(flash.bus().is_powered_down());
    // RDID is ignored in power-down; the data line stays quiet
    assert_eq!(flash.read_jedec_id(), 0);
    flash.release_power_down();
    assert!(!flash.bus().is_powered_down());
    assert_eq!(flash.read_jedec_id(), 0xC22015);
}
