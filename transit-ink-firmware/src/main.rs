//! transit-ink - E-Paper Departure Board Firmware
//!
//! Main firmware binary for the Raspberry Pi Pico W. Joins Wi-Fi, then
//! polls the configured endpoint for a JSON list of lines and draws them on
//! a 2.9" tri-color e-paper panel every few minutes.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use transit_ink_core::config::Settings;
use transit_ink_core::{RefreshConfig, Refresher};
use transit_ink_display::EpdPanel;
use transit_ink_drivers::epd::Il0373;

use crate::board::{EPD_SPI_FREQUENCY, HEAP_SIZE, STACK_SOCKETS};
use crate::network::WifiSession;

mod board;
mod network;
mod tasks;

// Heap allocator for JSON decoding
#[global_allocator]
static HEAP: Heap = Heap::empty();

/// Embedded settings (compiled into firmware)
/// Edit settings.toml and rebuild to change them
const EMBEDDED_SETTINGS: &str = include_str!("../settings.toml");

static CYW43_FIRMWARE: &[u8] = include_bytes!(env!("CYW43_FIRMWARE"));
static CYW43_CLM: &[u8] = include_bytes!(env!("CYW43_CLM"));

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static STACK_RESOURCES: StaticCell<embassy_net::StackResources<STACK_SOCKETS>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("transit-ink firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Settings come first: nothing touches the radio or the panel without them
    let settings = match Settings::parse(EMBEDDED_SETTINGS) {
        Ok(settings) => settings,
        Err(err) => defmt::panic!("{}", Display2Format(&err)),
    };
    info!(
        "Settings loaded: every {} s, rotation {}",
        settings.refresh_interval_s,
        settings.rotation.quarter_turns()
    );
    if settings.endpoint().is_none() {
        warn!("TRANSIT_ENDPOINT not set; refreshes will fail");
    }

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Panel on SPI0 (write only, no reset or busy line)
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = EPD_SPI_FREQUENCY;
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH1, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_20, Level::Low);
    let spi_device = unwrap!(ExclusiveDevice::new(spi, cs, Delay));
    let panel = EpdPanel::new(Il0373::new(spi_device, dc, Delay), settings.rotation);
    info!("Panel initialized");

    // CYW43 radio over PIO0
    let pwr = Output::new(p.PIN_23, Level::Low);
    let radio_cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let radio_spi = cyw43_pio::PioSpi::new(
        &mut pio.common,
        pio.sm0,
        cyw43_pio::DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        radio_cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, radio_spi, CYW43_FIRMWARE).await;
    spawner.spawn(tasks::cyw43_task(runner)).unwrap();

    control.init(CYW43_CLM).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let mut rng = RoscRng;
    let seed = rng.next_u64();
    let (stack, runner) = embassy_net::new(
        net_device,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(embassy_net::StackResources::new()),
        seed,
    );
    spawner.spawn(tasks::net_task(runner)).unwrap();

    network::join(&mut control, stack, &settings.ssid, &settings.password).await;
    let session = WifiSession::new(stack, rng.next_u64());

    let mut refresher = Refresher::new(session, panel, Delay, RefreshConfig::from(&settings));
    refresher.run().await
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
